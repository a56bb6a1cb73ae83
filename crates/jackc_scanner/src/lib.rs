//! jackc_scanner: Tokenizer for compilation units.
//!
//! Converts the text of one unit into an ordered token sequence in a single
//! left-to-right pass. Whitespace and comments produce no tokens; any
//! character outside the language aborts the whole unit.

mod char_codes;
mod scanner;
mod token;

pub use scanner::{tokenize, Scanner};
pub use token::Token;
