//! Runtime configuration.
//!
//! Everything environment-derived is resolved once, at process entry, into a
//! [`Config`] that is handed to the dispatcher. Components never read the
//! environment themselves, so tests can build a `Config` from fabricated
//! values via [`Config::from_lookup`].
//!
//! The host application keeps its data under `~/.local/share` on every
//! platform, so the XDG layout is applied explicitly rather than through the
//! platform conventions of `dirs`. Only the home directory itself comes from
//! the OS when `HOME` is unset.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `XDG_CONFIG_HOME` | Base for the vault file (default `$HOME/.config`) |
//! | `XDG_DATA_HOME` | Base for the host auth file (default `$HOME/.local/share`) |
//! | `AUTHSWAP_VAULT_FILE` | Explicit vault file path |
//! | `AUTHSWAP_AUTH_FILE` | Explicit host auth file path |
//! | `AUTHSWAP_PROVIDER` | Provider key inside the auth file (default `openai`) |
//! | `AUTHSWAP_KEYWORD` | Reserved command keyword (default `authswap`) |

use std::path::PathBuf;

use crate::error::{CommandError, Result};

/// Default reserved command keyword.
pub const DEFAULT_KEYWORD: &str = "authswap";

/// Default provider key in the host auth file.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Directory (under the config base) holding the vault file.
const VAULT_DIR: &str = "authswap";
const VAULT_FILE: &str = "profiles.json";

/// Directory (under the data base) holding the host auth file.
const HOST_DIR: &str = "opencode";
const HOST_AUTH_FILE: &str = "auth.json";

/// File locations used by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// The profile vault this tool owns.
    pub vault_file: PathBuf,
    /// The host's live auth file.
    pub live_file: PathBuf,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub paths: Paths,
    /// Provider key whose entry is read and written in the live file.
    pub provider_id: String,
    /// First token a command line must carry to be handled.
    pub keyword: String,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Config`] if a base directory cannot be
    /// determined.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. `fallback_home` is the home
    /// directory used when `HOME` itself is not set.
    pub fn from_lookup<F>(lookup: F, fallback_home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let home = || get("HOME").map(PathBuf::from).or_else(|| fallback_home.clone());

        let vault_file = match get("AUTHSWAP_VAULT_FILE") {
            Some(path) => PathBuf::from(path),
            None => {
                let base = get("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .or_else(|| home().map(|h| h.join(".config")))
                    .ok_or_else(|| CommandError::Config {
                        reason: "cannot locate a config directory (set XDG_CONFIG_HOME or HOME)"
                            .into(),
                    })?;
                base.join(VAULT_DIR).join(VAULT_FILE)
            }
        };

        let live_file = match get("AUTHSWAP_AUTH_FILE") {
            Some(path) => PathBuf::from(path),
            None => {
                let base = get("XDG_DATA_HOME")
                    .map(PathBuf::from)
                    .or_else(|| home().map(|h| h.join(".local").join("share")))
                    .ok_or_else(|| CommandError::Config {
                        reason: "cannot locate a data directory (set XDG_DATA_HOME or HOME)"
                            .into(),
                    })?;
                base.join(HOST_DIR).join(HOST_AUTH_FILE)
            }
        };

        let config = Self {
            paths: Paths {
                vault_file,
                live_file,
            },
            provider_id: get("AUTHSWAP_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            keyword: get("AUTHSWAP_KEYWORD").unwrap_or_else(|| DEFAULT_KEYWORD.to_string()),
        };

        tracing::debug!(
            vault = %config.paths.vault_file.display(),
            live = %config.paths.live_file.display(),
            provider = %config.provider_id,
            "configuration resolved"
        );
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn xdg_directories_take_precedence() {
        let config = Config::from_lookup(
            lookup(&[
                ("HOME", "/home/me"),
                ("XDG_CONFIG_HOME", "/cfg"),
                ("XDG_DATA_HOME", "/data"),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(
            config.paths.vault_file,
            PathBuf::from("/cfg/authswap/profiles.json")
        );
        assert_eq!(config.paths.live_file, PathBuf::from("/data/opencode/auth.json"));
        assert_eq!(config.provider_id, "openai");
        assert_eq!(config.keyword, "authswap");
    }

    #[test]
    fn home_fallbacks() {
        let config = Config::from_lookup(
            lookup(&[("HOME", "/home/me"), ("XDG_DATA_HOME", "")]),
            Some(PathBuf::from("/os/home")),
        )
        .unwrap();
        assert_eq!(
            config.paths.vault_file,
            PathBuf::from("/home/me/.config/authswap/profiles.json")
        );
        assert_eq!(
            config.paths.live_file,
            PathBuf::from("/home/me/.local/share/opencode/auth.json")
        );
    }

    #[test]
    fn explicit_overrides() {
        let config = Config::from_lookup(
            lookup(&[
                ("AUTHSWAP_VAULT_FILE", "/tmp/v.json"),
                ("AUTHSWAP_AUTH_FILE", "/tmp/a.json"),
                ("AUTHSWAP_PROVIDER", "codex"),
                ("AUTHSWAP_KEYWORD", "acct"),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(config.paths.vault_file, PathBuf::from("/tmp/v.json"));
        assert_eq!(config.paths.live_file, PathBuf::from("/tmp/a.json"));
        assert_eq!(config.provider_id, "codex");
        assert_eq!(config.keyword, "acct");
    }

    #[test]
    fn os_home_is_used_when_home_is_unset() {
        let config = Config::from_lookup(lookup(&[]), Some(PathBuf::from("/root"))).unwrap();
        assert_eq!(
            config.paths.vault_file,
            PathBuf::from("/root/.config/authswap/profiles.json")
        );
        assert_eq!(
            config.paths.live_file,
            PathBuf::from("/root/.local/share/opencode/auth.json")
        );
    }

    #[test]
    fn fails_without_any_base_directory() {
        let err = Config::from_lookup(lookup(&[]), None).unwrap_err();
        assert!(matches!(err, CommandError::Config { .. }));
        assert!(err.to_string().contains("XDG_CONFIG_HOME"));

        let err = Config::from_lookup(lookup(&[("XDG_CONFIG_HOME", "/cfg")]), None).unwrap_err();
        assert!(err.to_string().contains("XDG_DATA_HOME"));
    }
}
