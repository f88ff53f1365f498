//! Command dispatcher.
//!
//! A command line is `<keyword> [verb] [argument]`. Lines that do not start
//! with the reserved keyword belong to someone else and are ignored without
//! a trace. Everything else is executed and its outcome, success or failure,
//! is reported through [`HostClient::notify`]. Nothing is printed.
//!
//! | Verb | Aliases | Argument |
//! |------|---------|----------|
//! | `list` (default) | `ls` | none |
//! | `save` | `add` | profile name |
//! | `load` | `use`, `switch` | name or 1-based ordinal |
//! | `delete` | `rm`, `remove` | name or 1-based ordinal |

use std::sync::Arc;

use authswap_vault::{LiveSlot, ProfileStore, VaultError, is_active, select};
use chrono::Utc;

use crate::config::Config;
use crate::error::{CommandError, Result};
use crate::host::{HostClient, Severity};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A recognised verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Save,
    Load,
    Delete,
}

impl Verb {
    /// Parse a verb or one of its aliases.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "list" | "ls" => Some(Self::List),
            "save" | "add" => Some(Self::Save),
            "load" | "use" | "switch" => Some(Self::Load),
            "delete" | "rm" | "remove" => Some(Self::Delete),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Save => "save",
            Self::Load => "load",
            Self::Delete => "delete",
        }
    }

    fn argument_hint(self) -> Option<&'static str> {
        match self {
            Self::List => None,
            Self::Save => Some("<name>"),
            Self::Load | Self::Delete => Some("<name-or-number>"),
        }
    }
}

/// What happened to one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line was not addressed to this tool.
    Ignored,
    /// The command ran and a success/info notification was sent.
    Completed,
    /// The command failed and an error notification was sent.
    Failed,
}

/// The message produced by a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Report {
    message: String,
    severity: Severity,
}

impl Report {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Maps command lines onto vault and live-slot operations.
///
/// Holds no profile state between calls: each command loads what it needs
/// from disk.
pub struct Dispatcher {
    keyword: String,
    store: ProfileStore,
    live: LiveSlot,
    host: Arc<dyn HostClient>,
}

impl Dispatcher {
    /// Create a dispatcher for the files and keyword in `config`.
    pub fn new(config: &Config, host: Arc<dyn HostClient>) -> Self {
        Self {
            keyword: config.keyword.clone(),
            store: ProfileStore::new(&config.paths.vault_file),
            live: LiveSlot::new(&config.paths.live_file, &config.provider_id),
            host,
        }
    }

    /// The reserved keyword this dispatcher answers to.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Execute one command line.
    pub async fn execute(&self, line: &str) -> Outcome {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(self.keyword.as_str()) {
            return Outcome::Ignored;
        }
        let args: Vec<&str> = tokens.collect();

        match self.run(&args).await {
            Ok(report) => {
                self.host.notify(&report.message, report.severity).await;
                Outcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                self.host.notify(&e.to_string(), Severity::Error).await;
                Outcome::Failed
            }
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Report> {
        let verb_token = args.first().copied().unwrap_or("list");
        let verb = Verb::parse(verb_token).ok_or_else(|| CommandError::UnknownVerb {
            verb: verb_token.to_string(),
        })?;
        let argument = self.argument(verb, args.get(1..).unwrap_or_default())?;

        tracing::debug!(verb = verb.as_str(), "dispatching command");
        match (verb, argument) {
            (Verb::List, _) => self.list().await,
            (Verb::Save, Some(name)) => self.save(name).await,
            (Verb::Load, Some(token)) => self.load(token).await,
            (Verb::Delete, Some(token)) => self.delete(token).await,
            (_, None) => Err(self.usage(verb)),
        }
    }

    /// Check the argument count for `verb` and return the argument, if any.
    fn argument<'a>(&self, verb: Verb, rest: &[&'a str]) -> Result<Option<&'a str>> {
        match (verb.argument_hint(), rest) {
            (None, []) => Ok(None),
            (Some(_), [arg]) => Ok(Some(*arg)),
            _ => Err(self.usage(verb)),
        }
    }

    fn usage(&self, verb: Verb) -> CommandError {
        let usage = match verb.argument_hint() {
            Some(hint) => format!("{} {} {hint}", self.keyword, verb.as_str()),
            None => format!("{} {}", self.keyword, verb.as_str()),
        };
        CommandError::Usage { usage }
    }

    // -- Verbs --------------------------------------------------------------

    async fn list(&self) -> Result<Report> {
        let vault = self.store.load().await?;
        if vault.is_empty() {
            return Ok(Report::info(format!(
                "No saved profiles. Save the current login with `{} save <name>`.",
                self.keyword
            )));
        }

        // The live slot only decorates the listing. A missing file is normal;
        // an unreadable entry downgrades the report to a warning.
        let mut live_problem = None;
        let live = match self.live.read().await {
            Ok(credential) => Some(credential),
            Err(VaultError::LiveSlotMissing { .. }) => None,
            Err(e) => {
                tracing::warn!(error = %e, "live credential unreadable while listing");
                live_problem = Some(e);
                None
            }
        };

        let now = Utc::now();
        let mut lines = vec!["Saved profiles:".to_string()];
        for (idx, profile) in vault.entries().enumerate() {
            let credential = &profile.credential;
            let mut line = format!("{}. {}", idx + 1, profile.name);
            if let Some(id) = credential.display_id() {
                line.push_str(&format!(" <{id}>"));
            }
            if credential.is_expired_at(now) {
                line.push_str(" [token expired]");
            }
            if live.as_ref().is_some_and(|l| is_active(credential, l)) {
                line.push_str(" (active)");
            }
            lines.push(line);
        }

        match live_problem {
            Some(e) => {
                lines.push(format!("Active profile unknown: {e}"));
                Ok(Report::warning(lines.join("\n")))
            }
            None => Ok(Report::info(lines.join("\n"))),
        }
    }

    async fn save(&self, name: &str) -> Result<Report> {
        let credential = self.live.read().await?;
        let label = credential.display_id();
        self.store.save_profile(name, credential).await?;

        Ok(Report::success(match label {
            Some(id) => format!("Saved profile '{name}' ({id})"),
            None => format!("Saved profile '{name}'"),
        }))
    }

    async fn load(&self, token: &str) -> Result<Report> {
        let vault = self.store.load().await?;
        let name = select::resolve(token, &vault.sorted_names())?;
        let profile = vault
            .get(&name)
            .ok_or_else(|| VaultError::ProfileNotFound { name: name.clone() })?;

        self.live.write(&profile.credential).await?;
        self.host
            .set_live_credential(self.live.provider_id(), &profile.credential)
            .await?;

        tracing::info!(profile = %name, "switched live credential");
        Ok(Report::success(match profile.credential.display_id() {
            Some(id) => format!("Switched to profile '{name}' ({id})"),
            None => format!("Switched to profile '{name}'"),
        }))
    }

    async fn delete(&self, token: &str) -> Result<Report> {
        let vault = self.store.load().await?;
        let name = select::resolve(token, &vault.sorted_names())?;
        self.store.delete_profile(&name).await?;

        Ok(Report::success(format!("Deleted profile '{name}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
