//! CLI argument definitions for authswap.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching. Verb parsing itself belongs to the dispatcher; clap only
//! collects the raw words.

use clap::Parser;

/// authswap -- switch between saved OAuth logins.
#[derive(Parser, Debug)]
#[command(
    name = "authswap",
    version,
    about = "authswap -- switch between saved OAuth logins",
    long_about = "Saves the host application's current OAuth login under a name and \
                  restores it later.\n\n\
                  Commands:\n  \
                  list                      List saved profiles (default)\n  \
                  save <name>               Save the current login\n  \
                  load <name-or-number>     Make a saved profile the live login\n  \
                  delete <name-or-number>   Remove a saved profile\n\n\
                  Results are reported on stderr; stdout stays empty."
)]
pub struct Cli {
    /// Read command lines (`authswap <verb> [arg]`) from stdin, one per line.
    /// Lines addressed to other commands are ignored.
    #[arg(long, conflicts_with = "command")]
    pub stdin: bool,

    /// Verb and optional argument, e.g. `save work` or `load 2`.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_verb_and_argument() {
        let cli = Cli::try_parse_from(["authswap", "load", "2"]).unwrap();
        assert_eq!(cli.command, vec!["load", "2"]);
        assert!(!cli.stdin);
    }

    #[test]
    fn no_arguments_means_list() {
        let cli = Cli::try_parse_from(["authswap"]).unwrap();
        assert!(cli.command.is_empty());
    }

    #[test]
    fn stdin_conflicts_with_command() {
        assert!(Cli::try_parse_from(["authswap", "--stdin"]).is_ok());
        assert!(Cli::try_parse_from(["authswap", "--stdin", "list"]).is_err());
    }
}
