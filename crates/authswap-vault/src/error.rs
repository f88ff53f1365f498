//! Vault error types.
//!
//! All vault subsystems surface errors through [`VaultError`], which is the
//! single error type returned by every public API in this crate.  Each variant
//! carries enough context for callers to render a short message without
//! inspecting opaque strings.

use std::path::PathBuf;

/// Unified error type for the authswap profile vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    // -- Live slot errors ---------------------------------------------------
    /// The host's auth file does not exist yet.
    #[error("no auth file at {} (run the initial login first)", path.display())]
    LiveSlotMissing { path: PathBuf },

    /// The host's auth file exists but the provider entry is unusable.
    #[error("unexpected auth state: {reason}")]
    Shape { reason: String },

    // -- Store errors -------------------------------------------------------
    /// The vault file exists but cannot be trusted.
    #[error("profile vault {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// A profile with this name is already saved.
    #[error("profile '{name}' already exists (delete it first)")]
    NameTaken { name: String },

    /// The requested profile does not exist.
    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    /// The profile name is empty or whitespace.
    #[error("invalid profile name: {reason}")]
    InvalidName { reason: String },

    // -- Selection errors ---------------------------------------------------
    /// The user-supplied name or ordinal did not match any profile.
    #[error("no profile matches '{token}' ({available} saved)")]
    InvalidSelection { token: String, available: usize },

    // -- Underlying errors --------------------------------------------------
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Shorthand for building a [`VaultError::Shape`].
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::Shape {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
