use crate::error::{Error, Result};

/// Check that `name` is a legal XML name.
///
/// Follows the `Name` production loosely: a letter, `_` or `:` first, then
/// letters, digits, `-`, `.`, `_`, `:` or the middle dot. Non-ASCII letters
/// and digits are accepted.
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c == ':' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c == '-' || c == '.' || c == '\u{B7}' || c.is_alphanumeric()
}
