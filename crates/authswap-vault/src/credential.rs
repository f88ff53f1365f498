//! The OAuth credential bundle shared by the vault and the live auth slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::token;

/// An opaque OAuth credential bundle for the provider.
///
/// `refresh` and `access` are secrets and are never logged; the [`Debug`]
/// implementation redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Refresh token.
    pub refresh: String,

    /// Access token (a signed token whose claims are readable but unverified).
    pub access: String,

    /// Absolute expiry in milliseconds since the Unix epoch.
    pub expires: i64,

    /// Enterprise deployment URL, when the login was against one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_url: Option<String>,

    /// Stable account identifier. Kept in the vault only, never written
    /// back to the live slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Credential {
    /// Check the invariants every stored or restored credential must hold.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Shape`] if `refresh` or `access` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.refresh.is_empty() {
            return Err(VaultError::shape("refresh token is empty"));
        }
        if self.access.is_empty() {
            return Err(VaultError::shape("access token is empty"));
        }
        Ok(())
    }

    /// Best-effort display identifier (usually an email) from the access
    /// token's claims.
    pub fn display_id(&self) -> Option<String> {
        token::extract_display_id(&self.access)
    }

    /// Whether the access token's expiry lies before `now`. Informational.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires < now.timestamp_millis()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("refresh", &"<redacted>")
            .field("access", &"<redacted>")
            .field("expires", &self.expires)
            .field("enterprise_url", &self.enterprise_url)
            .field("account_id", &self.account_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Credential {
        Credential {
            refresh: "r1".to_string(),
            access: "a1".to_string(),
            expires: 1_000,
            enterprise_url: None,
            account_id: Some("acct1".to_string()),
        }
    }

    #[test]
    fn validate_rejects_empty_tokens() {
        let mut cred = sample();
        assert!(cred.validate().is_ok());

        cred.refresh.clear();
        assert!(matches!(cred.validate(), Err(VaultError::Shape { .. })));

        let mut cred = sample();
        cred.access.clear();
        assert!(matches!(cred.validate(), Err(VaultError::Shape { .. })));
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_options() {
        let mut cred = sample();
        cred.enterprise_url = Some("https://corp.example.com".to_string());
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(json["enterpriseUrl"], "https://corp.example.com");
        assert_eq!(json["accountId"], "acct1");

        cred.account_id = None;
        let json = serde_json::to_value(&cred).unwrap();
        assert!(json.get("accountId").is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("r1"));
        assert!(!rendered.contains("a1"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn expiry_comparison() {
        let cred = sample();
        let later = DateTime::from_timestamp_millis(2_000).unwrap();
        let earlier = DateTime::from_timestamp_millis(500).unwrap();
        assert!(cred.is_expired_at(later));
        assert!(!cred.is_expired_at(earlier));
    }
}
