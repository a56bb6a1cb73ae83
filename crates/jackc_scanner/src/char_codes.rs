//! Character classes used by the scanner.

pub const DOUBLE_QUOTE: char = '"';
pub const SLASH: char = '/';
pub const ASTERISK: char = '*';

/// Largest value a `push constant` operand can hold.
pub const MAX_INTEGER_CONSTANT: u32 = 32767;

/// Check if a character can start an identifier.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

/// Check if a character can be part of an identifier.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}
