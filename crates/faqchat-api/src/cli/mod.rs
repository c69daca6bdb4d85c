//! CLI command definitions and dispatch for the `faqchat` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `faqchat faq list`, `faqchat faq import bulk.json`).

pub mod chat;
pub mod faq;
pub mod session;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Answer customer questions from a stored FAQ.
#[derive(Parser)]
#[command(name = "faqchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `[server] port` from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host` from config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage FAQ entries.
    Faq {
        #[command(subcommand)]
        action: FaqCommand,
    },

    /// Send one message and print the bot's reply.
    ///
    /// Without `--session` a new conversation is started.
    Ask {
        /// The message to send.
        message: String,

        /// Continue an existing session instead of starting a new one.
        #[arg(long, short)]
        session: Option<String>,
    },

    /// Start an interactive conversation.
    Chat {
        /// Resume a previous session by ID.
        #[arg(long)]
        resume: Option<String>,
    },

    /// Print the transcript of a session.
    Transcript {
        /// Session ID.
        session_id: String,
    },

    /// Browse stored sessions, most recent first.
    Sessions {
        #[command(subcommand)]
        action: Option<SessionsCommand>,

        /// Maximum number of sessions to show.
        #[arg(long, short = 'n')]
        limit: Option<i64>,
    },

    /// System status dashboard.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FaqCommand {
    /// List all entries in match order.
    #[command(alias = "ls")]
    List,

    /// Show one entry with its options.
    Show {
        /// Entry ID.
        id: String,
    },

    /// Import entries from a JSON file (`{"items": [...]}` or a bare array).
    Import {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// Delete one entry.
    #[command(alias = "rm")]
    Delete {
        /// Entry ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Delete every entry.
    Clear {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// Delete a session and its transcript.
    #[command(alias = "rm")]
    Delete {
        /// Session ID.
        session_id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_session() {
        let cli = Cli::try_parse_from(["faqchat", "--json", "ask", "hours", "--session", "abc"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ask { message, session } => {
                assert_eq!(message, "hours");
                assert_eq!(session.as_deref(), Some("abc"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_faq_import_and_verbosity() {
        let cli = Cli::try_parse_from(["faqchat", "-vv", "faq", "import", "bulk.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Faq { action: FaqCommand::Import { .. } }
        ));
    }

    #[test]
    fn test_serve_port_is_optional() {
        let cli = Cli::try_parse_from(["faqchat", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { port: None, host: None }
        ));
    }

    #[test]
    fn test_parse_sessions_list_and_delete() {
        let cli = Cli::try_parse_from(["faqchat", "sessions", "-n", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sessions { action: None, limit: Some(5) }
        ));

        let cli = Cli::try_parse_from(["faqchat", "sessions", "rm", "abc", "--force"]).unwrap();
        match cli.command {
            Commands::Sessions {
                action: Some(SessionsCommand::Delete { session_id, force }),
                ..
            } => {
                assert_eq!(session_id, "abc");
                assert!(force);
            }
            _ => panic!("expected sessions delete"),
        }
    }
}
