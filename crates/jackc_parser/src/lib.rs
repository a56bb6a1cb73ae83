//! jackc_parser: Recursive descent parser for Jack classes.
//!
//! Consumes the scanner's token sequence and builds the owned syntax tree
//! of one class. Declarations are registered with the binder and usages are
//! resolved as they are parsed, so the finished tree carries every
//! resolution the emitter needs.

mod parser;
mod utilities;

pub use parser::{parse, ParsedUnit, Parser, MAX_NESTING_DEPTH};
