//! jackc_binder: Symbol tables and identifier resolution.
//!
//! The parser drives the binder while it walks a class: declaration sites
//! define names, usage sites resolve them. A class scope lives for the whole
//! unit; a subroutine scope is reset at the start of every subroutine.

mod binder;
mod symbol;

pub use binder::Binder;
pub use symbol::{SymbolTable, MAX_SYMBOL_INDEX};
