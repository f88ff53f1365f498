//! Adapter for the host application's live auth file.
//!
//! The host owns a JSON object keyed by provider id, one active credential
//! per provider. This module reads the entry for a single provider and
//! overwrites that entry in place. It never creates the file and never
//! touches other providers' entries.
//!
//! ```text
//! {
//!   "openai": { "type": "oauth", "refresh": "...", "access": "...",
//!               "expires": 1735689600000, "accountId": "..." },
//!   "anthropic": { ... untouched ... }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::credential::Credential;
use crate::error::{Result, VaultError};
use crate::fsutil;

/// The only entry type this adapter understands.
const OAUTH_TYPE: &str = "oauth";

/// Handle on one provider's entry in the host's auth file.
#[derive(Debug, Clone)]
pub struct LiveSlot {
    path: PathBuf,
    provider_id: String,
}

impl LiveSlot {
    /// Create an adapter for `provider_id` inside the auth file at `path`.
    pub fn new(path: impl Into<PathBuf>, provider_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            provider_id: provider_id.into(),
        }
    }

    /// Location of the host's auth file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The provider key this adapter reads and writes.
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Read and validate the provider's active credential.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::LiveSlotMissing`] if the file does not exist, or
    /// [`VaultError::Shape`] if the file or the provider entry is malformed.
    pub async fn read(&self) -> Result<Credential> {
        let root = self.read_root().await?;

        let entry = root.get(&self.provider_id).ok_or_else(|| {
            VaultError::shape(format!(
                "no '{}' credential in the auth file",
                self.provider_id
            ))
        })?;

        let credential = decode_entry(entry)?;
        tracing::debug!(
            provider = %self.provider_id,
            has_account_id = credential.account_id.is_some(),
            "read live credential"
        );
        Ok(credential)
    }

    /// Overwrite the provider's entry with `credential`.
    ///
    /// Only the fields the host understands are written; `accountId` stays
    /// in the vault.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::LiveSlotMissing`] if the file does not exist,
    /// [`VaultError::Shape`] if it is not a JSON object or the credential is
    /// invalid.
    pub async fn write(&self, credential: &Credential) -> Result<()> {
        credential.validate()?;

        let mut root = self.read_root().await?;
        root.insert(self.provider_id.clone(), encode_entry(credential));

        let bytes = serde_json::to_vec_pretty(&Value::Object(root))?;
        fsutil::write_atomic(&self.path, &bytes).await?;

        tracing::info!(
            provider = %self.provider_id,
            path = %self.path.display(),
            "wrote live credential"
        );
        Ok(())
    }

    async fn read_root(&self) -> Result<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VaultError::LiveSlotMissing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(VaultError::shape("auth file is not a JSON object")),
            Err(e) => Err(VaultError::shape(format!("auth file is not valid JSON: {e}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry codec
// ---------------------------------------------------------------------------

/// Decode and validate a provider entry from the host's auth file.
///
/// # Errors
///
/// Returns [`VaultError::Shape`] describing the first problem found.
pub fn decode_entry(entry: &Value) -> Result<Credential> {
    let obj = entry
        .as_object()
        .ok_or_else(|| VaultError::shape("credential entry is not an object"))?;

    match obj.get("type").and_then(Value::as_str) {
        Some(OAUTH_TYPE) => {}
        Some(other) => {
            return Err(VaultError::shape(format!(
                "unsupported credential type '{other}' (expected '{OAUTH_TYPE}')"
            )));
        }
        None => return Err(VaultError::shape("credential entry has no type")),
    }

    let credential = Credential {
        refresh: required_str(obj, "refresh")?,
        access: required_str(obj, "access")?,
        expires: required_timestamp(obj, "expires")?,
        enterprise_url: optional_str(obj, "enterpriseUrl")?,
        account_id: optional_str(obj, "accountId")?,
    };
    credential.validate()?;
    Ok(credential)
}

/// Encode a credential as a host auth entry (without `accountId`).
pub fn encode_entry(credential: &Credential) -> Value {
    let mut entry = Map::new();
    entry.insert("type".into(), Value::from(OAUTH_TYPE));
    entry.insert("refresh".into(), Value::from(credential.refresh.clone()));
    entry.insert("access".into(), Value::from(credential.access.clone()));
    entry.insert("expires".into(), Value::from(credential.expires));
    if let Some(url) = &credential.enterprise_url {
        entry.insert("enterpriseUrl".into(), Value::from(url.clone()));
    }
    Value::Object(entry)
}

fn required_str(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(VaultError::shape(format!("'{field}' is empty"))),
        Some(_) => Err(VaultError::shape(format!("'{field}' is not a string"))),
        None => Err(VaultError::shape(format!("'{field}' is missing"))),
    }
}

fn optional_str(obj: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(VaultError::shape(format!("'{field}' is not a string"))),
    }
}

fn required_timestamp(obj: &Map<String, Value>, field: &str) -> Result<i64> {
    let value = obj
        .get(field)
        .ok_or_else(|| VaultError::shape(format!("'{field}' is missing")))?;

    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .ok_or_else(|| VaultError::shape(format!("'{field}' is not a number")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_json(path: &Path, value: &Value) {
        std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    }

    #[test]
    fn decode_accepts_full_entry() {
        let cred = decode_entry(&json!({
            "type": "oauth",
            "refresh": "r",
            "access": "a",
            "expires": 1000,
            "enterpriseUrl": "https://corp.example.com",
            "accountId": "acct"
        }))
        .unwrap();
        assert_eq!(cred.refresh, "r");
        assert_eq!(cred.expires, 1000);
        assert_eq!(cred.enterprise_url.as_deref(), Some("https://corp.example.com"));
        assert_eq!(cred.account_id.as_deref(), Some("acct"));
    }

    #[test]
    fn decode_treats_empty_account_id_as_absent() {
        let cred = decode_entry(&json!({
            "type": "oauth",
            "refresh": "r",
            "access": "a",
            "expires": 1000,
            "accountId": ""
        }))
        .unwrap();
        assert_eq!(cred.account_id, None);
    }

    #[test]
    fn decode_rejects_wrong_type() {
        let err = decode_entry(&json!({ "type": "api", "key": "sk-..." })).unwrap_err();
        assert!(err.to_string().contains("unsupported credential type 'api'"));
    }

    #[test]
    fn decode_rejects_missing_or_mistyped_fields() {
        let cases = [
            json!({ "type": "oauth", "access": "a", "expires": 1 }),
            json!({ "type": "oauth", "refresh": "", "access": "a", "expires": 1 }),
            json!({ "type": "oauth", "refresh": "r", "access": 7, "expires": 1 }),
            json!({ "type": "oauth", "refresh": "r", "access": "a", "expires": "soon" }),
            json!({ "type": "oauth", "refresh": "r", "access": "a" }),
            json!({ "type": "oauth", "refresh": "r", "access": "a", "expires": 1, "accountId": 5 }),
            json!("oauth"),
        ];
        for case in cases {
            assert!(
                matches!(decode_entry(&case), Err(VaultError::Shape { .. })),
                "expected shape error for {case}"
            );
        }
    }

    #[test]
    fn encode_omits_account_id() {
        let cred = Credential {
            refresh: "r".into(),
            access: "a".into(),
            expires: 5,
            enterprise_url: None,
            account_id: Some("acct".into()),
        };
        let entry = encode_entry(&cred);
        assert_eq!(entry, json!({ "type": "oauth", "refresh": "r", "access": "a", "expires": 5 }));
    }

    #[tokio::test]
    async fn read_missing_file_is_live_slot_missing() {
        let dir = tempfile::tempdir().unwrap();
        let slot = LiveSlot::new(dir.path().join("auth.json"), "openai");
        assert!(matches!(
            slot.read().await,
            Err(VaultError::LiveSlotMissing { .. })
        ));
    }

    #[tokio::test]
    async fn read_missing_provider_is_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        write_json(&path, &json!({ "anthropic": { "type": "oauth" } }));

        let slot = LiveSlot::new(&path, "openai");
        let err = slot.read().await.unwrap_err();
        assert!(matches!(err, VaultError::Shape { .. }));
        assert!(err.to_string().contains("no 'openai' credential"));
    }

    #[tokio::test]
    async fn read_non_object_file_is_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let slot = LiveSlot::new(&path, "openai");
        assert!(matches!(slot.read().await, Err(VaultError::Shape { .. })));
    }

    #[tokio::test]
    async fn write_preserves_other_providers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        write_json(
            &path,
            &json!({
                "anthropic": { "type": "api", "key": "sk-ant" },
                "openai": { "type": "oauth", "refresh": "old", "access": "old", "expires": 1 }
            }),
        );

        let slot = LiveSlot::new(&path, "openai");
        let cred = Credential {
            refresh: "new-r".into(),
            access: "new-a".into(),
            expires: 99,
            enterprise_url: Some("https://corp.example.com".into()),
            account_id: Some("acct".into()),
        };
        slot.write(&cred).await.unwrap();

        let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["anthropic"], json!({ "type": "api", "key": "sk-ant" }));
        assert_eq!(on_disk["openai"]["refresh"], "new-r");
        assert_eq!(on_disk["openai"]["enterpriseUrl"], "https://corp.example.com");
        assert!(on_disk["openai"].get("accountId").is_none());
    }

    #[tokio::test]
    async fn write_never_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let slot = LiveSlot::new(&path, "openai");
        let cred = Credential {
            refresh: "r".into(),
            access: "a".into(),
            expires: 1,
            enterprise_url: None,
            account_id: None,
        };

        assert!(matches!(
            slot.write(&cred).await,
            Err(VaultError::LiveSlotMissing { .. })
        ));
        assert!(!path.exists());
    }
}
