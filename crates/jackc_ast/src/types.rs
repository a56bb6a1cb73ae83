//! Symbol-related definitions shared by the parser, binder and emitter.

use std::fmt;

/// The storage class of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Static,
    Field,
    Argument,
    Local,
}

impl SymbolKind {
    /// The scope level that owns names of this kind.
    pub fn scope_level(self) -> ScopeLevel {
        match self {
            SymbolKind::Static | SymbolKind::Field => ScopeLevel::Class,
            SymbolKind::Argument | SymbolKind::Local => ScopeLevel::Subroutine,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Static => "static",
            SymbolKind::Field => "field",
            SymbolKind::Argument => "argument",
            SymbolKind::Local => "local",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two concurrent scopes a table represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeLevel {
    Class,
    Subroutine,
}

/// A declared type: one of the primitives or a class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Int,
    Char,
    Boolean,
    Class(String),
}

impl TypeName {
    pub fn as_str(&self) -> &str {
        match self {
            TypeName::Int => "int",
            TypeName::Char => "char",
            TypeName::Boolean => "boolean",
            TypeName::Class(name) => name,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name registered in a scope.
///
/// `index` is dense per (scope, kind): the n-th declaration of a kind in a
/// scope gets index n, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub ty: TypeName,
    pub kind: SymbolKind,
    pub index: u16,
}

/// What an identifier usage was resolved to while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Found in the subroutine or class scope.
    Variable(SymbolEntry),
    /// Unresolved and capitalized: assumed to name a class.
    Class,
    /// Unresolved and not capitalized: assumed to name a subroutine of the
    /// implicit receiver.
    Subroutine,
}

impl Resolution {
    pub fn as_variable(&self) -> Option<&SymbolEntry> {
        match self {
            Resolution::Variable(entry) => Some(entry),
            _ => None,
        }
    }
}
