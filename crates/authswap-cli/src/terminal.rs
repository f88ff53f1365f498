//! Terminal implementation of the host interface.
//!
//! When run from a shell there is no host process to update in place: the
//! dispatcher has already rewritten the auth file, and the application reads
//! it on its next start. Notifications are rendered on stderr.

use std::io::Write as _;

use async_trait::async_trait;
use authswap_command::{HostClient, Severity};
use authswap_vault::Credential;

/// Renders notifications as `[severity] message` lines on stderr.
#[derive(Debug, Default)]
pub struct TerminalHost;

impl TerminalHost {
    pub fn new() -> Self {
        Self
    }
}

/// Prefix every line of `message` with the severity tag.
pub fn render(message: &str, severity: Severity) -> String {
    message
        .lines()
        .map(|line| format!("[{severity}] {line}\n"))
        .collect()
}

#[async_trait]
impl HostClient for TerminalHost {
    async fn notify(&self, message: &str, severity: Severity) {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(render(message, severity).as_bytes());
        let _ = stderr.flush();
    }

    async fn set_live_credential(
        &self,
        provider_id: &str,
        _credential: &Credential,
    ) -> authswap_command::Result<()> {
        tracing::info!(
            provider = provider_id,
            "live credential replaced; restart the host application to pick it up"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_tags_each_line() {
        assert_eq!(
            render("Saved profiles:\n1. work", Severity::Info),
            "[info] Saved profiles:\n[info] 1. work\n"
        );
        assert_eq!(render("boom", Severity::Error), "[error] boom\n");
    }
}
