//! JSON-file-backed profile vault.
//!
//! The [`ProfileStore`] owns a single JSON document mapping profile names to
//! credential snapshots. There is no long-lived in-memory state: every
//! operation loads the file, applies its change, and writes the whole
//! document back with an atomic replace.
//!
//! # Format
//!
//! ```text
//! {
//!   "version": 1,
//!   "profiles": {
//!     "work": { "name": "work", "oauth": { ... }, "savedAt": 1735689600000 }
//!   }
//! }
//! ```
//!
//! A missing file is an empty vault. A file with an unknown version or a
//! malformed profile map is reported as [`VaultError::Corrupt`] and is never
//! rewritten automatically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credential::Credential;
use crate::error::{Result, VaultError};
use crate::fsutil;

/// The only vault schema version this build reads and writes.
pub const VAULT_VERSION: u64 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named credential snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique profile name (the vault key).
    pub name: String,

    /// The stored credential.
    #[serde(rename = "oauth")]
    pub credential: Credential,

    /// When the profile was saved. Never changes afterwards.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

/// The versioned profile collection.
///
/// Profiles are kept in a `BTreeMap`, so iteration order is the
/// case-sensitive lexicographic order used for ordinal selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vault {
    pub version: u64,
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Vault {
    fn default() -> Self {
        Self {
            version: VAULT_VERSION,
            profiles: BTreeMap::new(),
        }
    }
}

impl Vault {
    /// Profile names in selection order.
    pub fn sorted_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Profiles in selection order.
    pub fn entries(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Decode and validate a vault document.
    fn from_value(path: &Path, value: Value) -> Result<Self> {
        let corrupt = |reason: String| VaultError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let Value::Object(mut root) = value else {
            return Err(corrupt("top level is not a JSON object".into()));
        };

        match root.get("version").and_then(Value::as_u64) {
            Some(VAULT_VERSION) => {}
            Some(other) => return Err(corrupt(format!("unsupported version {other}"))),
            None => return Err(corrupt("missing or non-numeric version".into())),
        }

        let Some(Value::Object(raw_profiles)) = root.remove("profiles") else {
            return Err(corrupt("'profiles' is missing or not an object".into()));
        };

        let mut profiles = BTreeMap::new();
        for (key, raw) in raw_profiles {
            let profile: Profile = serde_json::from_value(raw)
                .map_err(|e| corrupt(format!("profile '{key}': {e}")))?;
            if profile.name != key {
                return Err(corrupt(format!(
                    "profile '{key}' is stored under the name '{}'",
                    profile.name
                )));
            }
            profile
                .credential
                .validate()
                .map_err(|e| corrupt(format!("profile '{key}': {e}")))?;
            profiles.insert(key, profile);
        }

        Ok(Self {
            version: VAULT_VERSION,
            profiles,
        })
    }
}

/// Whether a stored credential is the one currently in the live slot.
///
/// Account ids win when both sides carry a non-empty one; otherwise the
/// refresh tokens are compared. Used for display only.
pub fn is_active(stored: &Credential, live: &Credential) -> bool {
    let account = |c: &Credential| c.account_id.clone().filter(|id| !id.is_empty());
    match (account(stored), account(live)) {
        (Some(a), Some(b)) => a == b,
        _ => stored.refresh == live.refresh,
    }
}

// ---------------------------------------------------------------------------
// ProfileStore
// ---------------------------------------------------------------------------

/// Durable profile vault backed by one JSON file.
///
/// # Example
///
/// ```rust,no_run
/// # use authswap_vault::{Credential, ProfileStore};
/// # async fn example(credential: Credential) -> authswap_vault::Result<()> {
/// let store = ProfileStore::new("/home/me/.config/authswap/profiles.json");
///
/// store.save_profile("work", credential).await?;
/// for profile in store.load().await?.entries() {
///     println!("{}", profile.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Create a store for the vault file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the vault, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Corrupt`] if the file exists but is not a valid
    /// version-1 vault.
    pub async fn load(&self) -> Result<Vault> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no vault file, starting empty");
                return Ok(Vault::default());
            }
            Err(e) => return Err(e.into()),
        };

        let value: Value = serde_json::from_str(&content).map_err(|e| VaultError::Corrupt {
            path: self.path.clone(),
            reason: format!("invalid JSON: {e}"),
        })?;

        let vault = Vault::from_value(&self.path, value)?;
        tracing::debug!(path = %self.path.display(), count = vault.len(), "loaded vault");
        Ok(vault)
    }

    /// Persist the whole vault in a single atomic replace.
    pub async fn save(&self, vault: &Vault) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(vault)?;
        fsutil::write_atomic(&self.path, &bytes).await
    }

    /// Save `credential` under a new profile `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NameTaken`] if the name is already used (the
    /// vault is left untouched), [`VaultError::InvalidName`] for a blank
    /// name, or [`VaultError::Shape`] for an invalid credential.
    pub async fn save_profile(&self, name: &str, credential: Credential) -> Result<Profile> {
        if name.trim().is_empty() {
            return Err(VaultError::InvalidName {
                reason: "name must not be empty".into(),
            });
        }
        credential.validate()?;

        let mut vault = self.load().await?;
        if vault.profiles.contains_key(name) {
            return Err(VaultError::NameTaken {
                name: name.to_string(),
            });
        }

        let profile = Profile {
            name: name.to_string(),
            credential,
            // Millisecond precision, matching what the file can hold.
            saved_at: Utc::now().trunc_subsecs(3),
        };
        vault.profiles.insert(profile.name.clone(), profile.clone());
        self.save(&vault).await?;

        tracing::info!(profile = name, count = vault.len(), "saved profile");
        Ok(profile)
    }

    /// Remove the profile `name`, returning what was removed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::ProfileNotFound`] if no such profile exists.
    pub async fn delete_profile(&self, name: &str) -> Result<Profile> {
        let mut vault = self.load().await?;
        let removed = vault
            .profiles
            .remove(name)
            .ok_or_else(|| VaultError::ProfileNotFound {
                name: name.to_string(),
            })?;
        self.save(&vault).await?;

        tracing::info!(profile = name, count = vault.len(), "deleted profile");
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
