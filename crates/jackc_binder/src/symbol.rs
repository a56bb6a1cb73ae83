//! Symbol table definitions.

use indexmap::IndexMap;
use jackc_ast::node::Identifier;
use jackc_ast::types::{ScopeLevel, SymbolEntry, SymbolKind, TypeName};
use jackc_diagnostics::{CodeGenAssertionError, CompileError, DuplicateSymbolError};
use rustc_hash::{FxBuildHasher, FxHashMap};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Largest index a VM segment operand can hold.
pub const MAX_SYMBOL_INDEX: u16 = i16::MAX as u16;

/// A single scope: names to entries, plus one index counter per kind.
///
/// Entries keep their declaration order so a table can be listed back in
/// the order the source declared it.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    level: ScopeLevel,
    table: FxIndexMap<String, SymbolEntry>,
    counters: FxHashMap<SymbolKind, u16>,
}

impl SymbolTable {
    pub fn new(level: ScopeLevel) -> Self {
        Self {
            level,
            table: FxIndexMap::default(),
            counters: FxHashMap::default(),
        }
    }

    /// Insert `name` with the next free index for `kind`.
    ///
    /// Fails on a name already in this scope, or when `kind` has used up
    /// every index a segment operand can address.
    pub fn define(
        &mut self,
        name: &Identifier,
        ty: TypeName,
        kind: SymbolKind,
    ) -> Result<SymbolEntry, CompileError> {
        debug_assert_eq!(kind.scope_level(), self.level);

        if self.table.contains_key(&name.text) {
            return Err(DuplicateSymbolError {
                name: name.text.clone(),
                span: name.range,
            }
            .into());
        }

        let counter = self.counters.entry(kind).or_insert(0);
        let index = *counter;
        if index > MAX_SYMBOL_INDEX {
            return Err(CodeGenAssertionError::new(
                format!("too many {kind} variables: `{}` exceeds index {MAX_SYMBOL_INDEX}", name.text),
                Some(name.range),
            )
            .into());
        }
        let entry = SymbolEntry {
            name: name.text.clone(),
            ty,
            kind,
            index,
        };
        *counter = index + 1;

        self.table.insert(name.text.clone(), entry.clone());
        Ok(entry)
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.table.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// How many names of `kind` this scope holds.
    pub fn count_of(&self, kind: SymbolKind) -> u16 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.table.values()
    }

    /// Drop every entry and restart every counter at 0.
    pub fn clear(&mut self) {
        self.table.clear();
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackc_core::text::TextRange;

    fn ident(text: &str) -> Identifier {
        Identifier {
            text: text.to_string(),
            range: TextRange::empty(0),
        }
    }

    #[test]
    fn test_counters_are_per_kind() {
        let mut table = SymbolTable::new(ScopeLevel::Class);
        let a = table.define(&ident("a"), TypeName::Int, SymbolKind::Field).unwrap();
        let b = table.define(&ident("b"), TypeName::Int, SymbolKind::Static).unwrap();
        let c = table.define(&ident("c"), TypeName::Char, SymbolKind::Field).unwrap();
        assert_eq!((a.index, b.index, c.index), (0, 0, 1));
        assert_eq!(table.count_of(SymbolKind::Field), 2);
        assert_eq!(table.count_of(SymbolKind::Static), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut table = SymbolTable::new(ScopeLevel::Subroutine);
        table.define(&ident("x"), TypeName::Int, SymbolKind::Local).unwrap();
        let err = table
            .define(&ident("x"), TypeName::Boolean, SymbolKind::Argument)
            .unwrap_err();
        assert!(matches!(err, CompileError::DuplicateSymbol(ref e) if e.name == "x"));
        // The failed define must not consume an index.
        assert_eq!(table.count_of(SymbolKind::Argument), 0);
    }

    #[test]
    fn test_index_space_is_bounded() {
        let mut table = SymbolTable::new(ScopeLevel::Class);
        for i in 0..=MAX_SYMBOL_INDEX {
            table.define(&ident(&format!("f{i}")), TypeName::Int, SymbolKind::Field).unwrap();
        }
        assert_eq!(table.count_of(SymbolKind::Field), MAX_SYMBOL_INDEX + 1);
        assert_eq!(table.get("f32767").map(|e| e.index), Some(MAX_SYMBOL_INDEX));

        let err = table
            .define(&ident("overflow"), TypeName::Int, SymbolKind::Field)
            .unwrap_err();
        assert!(matches!(err, CompileError::CodeGenAssertion(_)));
        assert!(!table.has("overflow"));
        assert_eq!(table.count_of(SymbolKind::Field), MAX_SYMBOL_INDEX + 1);

        // Other kinds keep their own budget.
        let s = table.define(&ident("s"), TypeName::Int, SymbolKind::Static).unwrap();
        assert_eq!(s.index, 0);
    }

    #[test]
    fn test_iter_keeps_declaration_order() {
        let mut table = SymbolTable::new(ScopeLevel::Subroutine);
        for name in ["z", "a", "m"] {
            table.define(&ident(name), TypeName::Int, SymbolKind::Local).unwrap();
        }
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.count_of(SymbolKind::Local), 0);
    }
}
