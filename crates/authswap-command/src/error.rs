//! Error types for the command crate.
//!
//! All dispatcher operations surface errors through [`CommandError`]. Vault
//! failures are wrapped unchanged so their messages reach the user as-is.

use authswap_vault::VaultError;

/// Unified error type for the authswap command layer.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A verb was given the wrong number of arguments.
    #[error("usage: {usage}")]
    Usage {
        /// The expected form, e.g. `authswap save <name>`.
        usage: String,
    },

    /// The verb is not one this tool understands.
    #[error("unknown command '{verb}' (expected list, save, load or delete)")]
    UnknownVerb {
        /// The verb as typed.
        verb: String,
    },

    /// Required directories or settings could not be resolved.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What is missing.
        reason: String,
    },

    /// An error propagated from the vault crate.
    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CommandError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
