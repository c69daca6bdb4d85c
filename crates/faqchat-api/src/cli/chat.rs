//! Conversation CLI commands: one-shot `ask` and the interactive `chat` loop.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;

use faqchat_types::chat::{ChatReply, SessionId};

use crate::state::AppState;

/// Commands typed at the interactive prompt instead of a message.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    /// Leave the loop.
    Quit,
    /// Drop the current session; the next message starts a new one.
    New,
    /// Print the current transcript.
    Transcript,
    /// List commands.
    Help,
}

impl ChatCommand {
    /// Parse a `/command` line. Returns `None` for ordinary messages.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let cmd = line.trim().strip_prefix('/')?;
        Some(match cmd.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "new" => Ok(Self::New),
            "transcript" | "history" => Ok(Self::Transcript),
            "help" | "?" => Ok(Self::Help),
            other => Err(format!("unknown command: /{other}")),
        })
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId> {
    raw.parse()
        .with_context(|| format!("'{raw}' is not a valid session id"))
}

/// Send one message: start a session, or continue `session` when given.
pub async fn ask(
    state: &AppState,
    message: &str,
    session: Option<&str>,
    json: bool,
) -> Result<()> {
    let reply = match session {
        Some(raw) => {
            let session_id = parse_session_id(raw)?;
            state
                .engine
                .continue_conversation(&session_id, message)
                .await
                .with_context(|| format!("Could not continue session {session_id}"))?
        }
        None => state.engine.start_conversation(message).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print_reply(&reply);
        println!(
            "  {}",
            style(format!(
                "Continue with: faqchat ask --session {} \"...\"",
                reply.session_id
            ))
            .dim()
        );
        println!();
    }

    Ok(())
}

/// Interactive loop. Each line is one turn; the first line opens a session
/// unless `resume` names an existing one.
pub async fn run_chat_loop(state: &AppState, resume: Option<String>) -> Result<()> {
    let mut session_id = match resume {
        Some(raw) => {
            let id = parse_session_id(&raw)?;
            // Fail early rather than on the first message.
            state
                .engine
                .get_transcript(&id)
                .await
                .with_context(|| format!("Session {id} not found"))?;
            Some(id)
        }
        None => None,
    };

    println!();
    println!(
        "  {} faqchat v{}",
        style("?").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "  {}",
        style("Ask a question. /help for commands, /quit to leave.").dim()
    );
    if let Some(id) = &session_id {
        println!("  {} {}", style("Resuming session").dim(), style(id).dim());
    }
    println!();

    loop {
        let line: String = Input::new()
            .with_prompt(format!("{}", style("you").green().bold()))
            .allow_empty(true)
            .interact_text()?;

        if line.trim().is_empty() {
            continue;
        }

        if let Some(command) = ChatCommand::parse(&line) {
            match command {
                Ok(ChatCommand::Quit) => break,
                Ok(ChatCommand::New) => {
                    session_id = None;
                    println!("  {}", style("Started a fresh conversation.").dim());
                }
                Ok(ChatCommand::Transcript) => match &session_id {
                    Some(id) => {
                        let session = state.engine.get_transcript(id).await?;
                        super::session::print_transcript(&session);
                    }
                    None => println!("  {}", style("No messages yet.").dim()),
                },
                Ok(ChatCommand::Help) => print_help(),
                Err(msg) => println!("  {} {msg}", style("!").yellow().bold()),
            }
            continue;
        }

        let result = match &session_id {
            Some(id) => state.engine.continue_conversation(id, &line).await,
            None => state.engine.start_conversation(&line).await,
        };

        match result {
            Ok(reply) => {
                session_id = Some(reply.session_id);
                print_reply(&reply);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat turn failed");
                println!("  {} {e}", style("✗").red().bold());
            }
        }
    }

    if let Some(id) = session_id {
        println!();
        println!("  {} {}", style("Session saved:").dim(), style(id).cyan());
    }
    println!();

    Ok(())
}

fn print_reply(reply: &ChatReply) {
    println!();
    println!("  {} {}", style("bot").cyan().bold(), reply.reply);
    for option in &reply.options {
        println!("      {} {}", style("›").dim(), style(option).yellow());
    }
    println!();
}

fn print_help() {
    println!();
    println!("  {}    leave the chat", style("/quit").yellow());
    println!("  {}     start a new conversation", style("/new").yellow());
    println!("  {} show this conversation so far", style("/transcript").yellow());
    println!("  {}    this help", style("/help").yellow());
    println!();
}
