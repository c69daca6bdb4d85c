//! Session browsing CLI commands: list, transcript and delete.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use faqchat_core::chat::repository::SessionRepository;
use faqchat_types::chat::{ChatSession, Sender, SessionId};

use crate::state::AppState;

/// List stored sessions, most recently active first.
///
/// # Examples
///
/// ```bash
/// faqchat sessions
/// faqchat sessions -n 10 --json
/// ```
pub async fn list_sessions(state: &AppState, limit: Option<i64>, json: bool) -> Result<()> {
    let sessions = state.engine.session_repo().list_recent(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("faqchat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Started").fg(Color::White),
        Cell::new("Last Active").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
    ]);

    for session in &sessions {
        table.add_row(vec![
            Cell::new(session.session_id).fg(Color::Cyan),
            Cell::new(session.started_at.format("%Y-%m-%d %H:%M")).fg(Color::White),
            Cell::new(session.last_activity_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
            Cell::new(session.message_count).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Print the full transcript of a session.
pub async fn show_transcript(state: &AppState, session_id: &str, json: bool) -> Result<()> {
    let id: SessionId = session_id
        .parse()
        .with_context(|| format!("'{session_id}' is not a valid session id"))?;

    let session = state
        .engine
        .get_transcript(&id)
        .await
        .with_context(|| format!("Session {id} not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!("  Session {}", style(id).cyan().bold());
    print_transcript(&session);

    Ok(())
}

/// Delete a session and its transcript, asking first unless `force`.
pub async fn delete_session(
    state: &AppState,
    session_id: &str,
    force: bool,
    json: bool,
) -> Result<()> {
    let id: SessionId = session_id
        .parse()
        .with_context(|| format!("'{session_id}' is not a valid session id"))?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete session {}?", style(id).red().bold()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state
        .engine
        .delete_session(&id)
        .await
        .with_context(|| format!("Session {id} not found"))?;

    if json {
        println!("{}", serde_json::json!({ "deleted": true, "id": id }));
    } else {
        println!("  {} Session {} deleted.", style("✓").red().bold(), id);
    }

    Ok(())
}

pub fn print_transcript(session: &ChatSession) {
    println!();
    for message in &session.messages {
        let who = match message.sender {
            Sender::User => style("you").green().bold(),
            Sender::Bot => style("bot").cyan().bold(),
        };
        println!(
            "  {} {} {}",
            style(message.timestamp.format("%H:%M:%S")).dim(),
            who,
            message.text
        );
    }
    println!();
}
