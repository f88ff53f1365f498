//! Command layer for authswap.
//!
//! Turns a one-line command (`authswap save work`, `authswap load 2`, ...)
//! into operations on the profile vault and the host's live auth file, and
//! reports the result through a host-provided notification channel.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//! ├── Verb parsing   (list / save / load / delete + aliases)
//! ├── ProfileStore   (authswap-vault, JSON vault file)
//! ├── LiveSlot       (authswap-vault, host auth file)
//! └── HostClient     (notifications + live credential push)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use authswap_command::{Config, Dispatcher, RecordingHost};
//!
//! # async fn example() -> authswap_command::Result<()> {
//! let config = Config::from_env()?;
//! let host = Arc::new(RecordingHost::new());
//! let dispatcher = Dispatcher::new(&config, host.clone());
//!
//! dispatcher.execute("authswap list").await;
//! println!("{:?}", host.last_notification());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;

// Re-export key types at the crate root for convenience.
pub use config::{Config, Paths};
pub use dispatch::{Dispatcher, Outcome, Verb};
pub use error::{CommandError, Result};
pub use host::{HostClient, RecordingHost, Severity};
