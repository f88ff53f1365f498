//! Name-or-ordinal profile selection.

use crate::error::{Result, VaultError};

/// Resolve a user-supplied selector against `ordered_names`.
///
/// A token that is a canonical positive integer (`"2"`, not `"02"` or
/// `"+2"`) is a 1-based position in `ordered_names`. Anything else is taken
/// literally as a name. Either way the result is checked for existence.
///
/// # Errors
///
/// Returns [`VaultError::InvalidSelection`] if the ordinal is out of range or
/// the name is not present.
pub fn resolve(token: &str, ordered_names: &[String]) -> Result<String> {
    let invalid = || VaultError::InvalidSelection {
        token: token.to_string(),
        available: ordered_names.len(),
    };

    if let Some(ordinal) = parse_ordinal(token) {
        return ordinal
            .checked_sub(1)
            .and_then(|idx| ordered_names.get(idx))
            .cloned()
            .ok_or_else(invalid);
    }

    ordered_names
        .iter()
        .find(|name| name.as_str() == token)
        .cloned()
        .ok_or_else(invalid)
}

/// Parse `token` as an ordinal only if it round-trips exactly.
fn parse_ordinal(token: &str) -> Option<usize> {
    let n: usize = token.parse().ok()?;
    (n > 0 && n.to_string() == token).then_some(n)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
