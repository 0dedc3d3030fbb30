//! Identifier validators for schema/storage objects and queue names.

use crate::error::{ensure, Result};
use crate::policy::MAX_OBJECT_NAME_LENGTH;

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Storage-object identifier: `^[A-Za-z_][A-Za-z0-9_]*$`, at most 50 characters.
pub fn assert_postgres_object_name(name: &str) -> Result<()> {
    ensure!(!name.is_empty(), "Name is required");
    ensure!(
        name.chars().count() <= MAX_OBJECT_NAME_LENGTH,
        "Name cannot exceed {} characters",
        MAX_OBJECT_NAME_LENGTH
    );
    ensure!(
        name.chars().all(is_word_char),
        "Name can only contain alphanumeric characters or underscores"
    );
    ensure!(
        !name.starts_with(|c: char| c.is_ascii_digit()),
        "Name cannot start with a number"
    );
    Ok(())
}

pub fn is_valid_postgres_object_name(name: &str) -> bool {
    assert_postgres_object_name(name).is_ok()
}

/// Queue name check.
///
/// The character test is a search, not a full match: a name passes as long
/// as it contains at least one word character or hyphen somewhere. Names
/// such as `"orders/eu"` are accepted.
pub fn assert_queue_name(name: &str) -> Result<()> {
    ensure!(!name.is_empty(), "Name is required");
    ensure!(
        name.chars().any(|c| is_word_char(c) || c == '-'),
        "Name can only contain alphanumeric characters, underscores, or hyphens"
    );
    Ok(())
}

pub fn is_valid_queue_name(name: &str) -> bool {
    assert_queue_name(name).is_ok()
}
