//! The host application seen from the dispatcher.
//!
//! The dispatcher needs two capabilities from whatever is embedding it: a
//! side channel for short user-facing notifications, and a way to tell a
//! running host that its live credential changed. Both live behind the
//! [`HostClient`] trait so production code and tests can supply their own.

use std::sync::Mutex;

use async_trait::async_trait;
use authswap_vault::Credential;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Classification of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Capabilities the dispatcher requires from its host.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Show a short message outside the primary output channel.
    ///
    /// Notifications are best-effort; implementations swallow their own
    /// delivery failures.
    async fn notify(&self, message: &str, severity: Severity);

    /// Tell the host that `provider_id` now uses `credential`.
    async fn set_live_credential(&self, provider_id: &str, credential: &Credential) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Recording host
// ---------------------------------------------------------------------------

/// A [`HostClient`] that records every call. Intended for tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    notifications: Mutex<Vec<(String, Severity)>>,
    live_updates: Mutex<Vec<(String, Credential)>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far, oldest first.
    pub fn notifications(&self) -> Vec<(String, Severity)> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// The most recent notification, if any.
    pub fn last_notification(&self) -> Option<(String, Severity)> {
        self.notifications().pop()
    }

    /// All `set_live_credential` calls so far, oldest first.
    pub fn live_updates(&self) -> Vec<(String, Credential)> {
        self.live_updates
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HostClient for RecordingHost {
    async fn notify(&self, message: &str, severity: Severity) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push((message.to_string(), severity));
        }
    }

    async fn set_live_credential(&self, provider_id: &str, credential: &Credential) -> Result<()> {
        if let Ok(mut updates) = self.live_updates.lock() {
            updates.push((provider_id.to_string(), credential.clone()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
