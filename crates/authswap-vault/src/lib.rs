//! Profile vault for authswap.
//!
//! This crate stores named snapshots of one provider's OAuth credential and
//! moves them in and out of the host application's live auth file. It does
//! not perform logins, refresh tokens, or verify token signatures; the
//! credential material is copied around as-is.
//!
//! # Modules
//!
//! - [`credential`] — the OAuth credential bundle and its invariants.
//! - [`token`] — best-effort access-token claim decoding for display.
//! - [`live`] — read/write adapter for the host's auth file.
//! - [`store`] — the JSON-file-backed profile vault.
//! - [`select`] — name-or-ordinal profile resolution.
//! - [`error`] — Unified error types.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use authswap_vault::{LiveSlot, ProfileStore, select};
//!
//! # async fn example() -> authswap_vault::Result<()> {
//! let live = LiveSlot::new("/home/me/.local/share/opencode/auth.json", "openai");
//! let store = ProfileStore::new("/home/me/.config/authswap/profiles.json");
//!
//! // Snapshot the current login.
//! store.save_profile("work", live.read().await?).await?;
//!
//! // Later: switch back to it by position.
//! let vault = store.load().await?;
//! let name = select::resolve("1", &vault.sorted_names())?;
//! if let Some(profile) = vault.get(&name) {
//!     live.write(&profile.credential).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod credential;
pub mod error;
mod fsutil;
pub mod live;
pub mod select;
pub mod store;
pub mod token;

// Re-export the most commonly used types at the crate root for convenience.
pub use credential::Credential;
pub use error::{Result, VaultError};
pub use live::LiveSlot;
pub use store::{Profile, ProfileStore, Vault, is_active};
