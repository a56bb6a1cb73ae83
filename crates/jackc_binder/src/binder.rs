//! The binder implementation.
//!
//! Holds the two scopes that are live while a subroutine is parsed and
//! answers resolution queries for identifier usages:
//! - subroutine scope first (arguments, locals)
//! - then the class scope (statics, fields)
//! - then the capitalization fallback for names neither scope knows

use crate::symbol::SymbolTable;
use jackc_ast::node::Identifier;
use jackc_ast::types::{Resolution, ScopeLevel, SymbolEntry, SymbolKind, TypeName};
use jackc_diagnostics::CompileError;

/// Scope state for one compilation unit.
#[derive(Debug, Clone)]
pub struct Binder {
    class_scope: SymbolTable,
    subroutine_scope: SymbolTable,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    pub fn new() -> Self {
        Self {
            class_scope: SymbolTable::new(ScopeLevel::Class),
            subroutine_scope: SymbolTable::new(ScopeLevel::Subroutine),
        }
    }

    /// Start a fresh subroutine scope. Argument and local counters restart at 0.
    pub fn enter_subroutine(&mut self) {
        self.subroutine_scope.clear();
    }

    /// Discard the subroutine scope.
    pub fn exit_subroutine(&mut self) {
        self.subroutine_scope.clear();
    }

    /// Define a name in the scope that owns `kind`.
    pub fn define(
        &mut self,
        name: &Identifier,
        ty: TypeName,
        kind: SymbolKind,
    ) -> Result<SymbolEntry, CompileError> {
        match kind.scope_level() {
            ScopeLevel::Class => self.class_scope.define(name, ty, kind),
            ScopeLevel::Subroutine => self.subroutine_scope.define(name, ty, kind),
        }
    }

    /// Look a name up in the subroutine scope, then the class scope.
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    /// Resolve a usage. Names found in neither scope are classified by their
    /// first character: upper-case means a class, anything else a subroutine
    /// of the implicit receiver. Declared names always win over the guess,
    /// capitalized or not.
    pub fn resolve(&self, name: &str) -> Resolution {
        match self.lookup(name) {
            Some(entry) => Resolution::Variable(entry.clone()),
            None if starts_upper_case(name) => Resolution::Class,
            None => Resolution::Subroutine,
        }
    }

    pub fn class_scope(&self) -> &SymbolTable {
        &self.class_scope
    }

    /// Hand the class scope over to code generation.
    pub fn into_class_scope(self) -> SymbolTable {
        self.class_scope
    }
}

fn starts_upper_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
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
    fn test_subroutine_scope_shadows_class_scope() {
        let mut binder = Binder::new();
        binder.define(&ident("x"), TypeName::Int, SymbolKind::Field).unwrap();
        binder.enter_subroutine();
        binder.define(&ident("x"), TypeName::Char, SymbolKind::Local).unwrap();

        let entry = binder.lookup("x").unwrap();
        assert_eq!(entry.kind, SymbolKind::Local);

        binder.exit_subroutine();
        assert_eq!(binder.lookup("x").unwrap().kind, SymbolKind::Field);
    }

    #[test]
    fn test_heuristic_fallback() {
        let binder = Binder::new();
        assert_eq!(binder.resolve("Output"), Resolution::Class);
        assert_eq!(binder.resolve("helper"), Resolution::Subroutine);
        assert_eq!(binder.resolve("_tmp"), Resolution::Subroutine);
    }

    #[test]
    fn test_enter_subroutine_resets_counters() {
        let mut binder = Binder::new();
        binder.enter_subroutine();
        binder.define(&ident("a"), TypeName::Int, SymbolKind::Argument).unwrap();
        binder.enter_subroutine();
        let b = binder.define(&ident("b"), TypeName::Int, SymbolKind::Argument).unwrap();
        assert_eq!(b.index, 0);
        assert!(binder.lookup("a").is_none());
    }
}
