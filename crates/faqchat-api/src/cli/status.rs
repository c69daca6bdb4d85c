//! System status dashboard command.

use anyhow::Result;
use console::style;

use faqchat_core::chat::repository::SessionRepository;
use faqchat_infra::config::resolve_database_url;

use crate::state::AppState;

/// Display system status dashboard.
///
/// Shows entry and session counts, storage info, and version.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let entries = state.faq_service.count().await?;
    let sessions = state.engine.session_repo().count().await?;
    let database = resolve_database_url(&state.config, &state.data_dir);

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": database,
            "faq_entries": entries,
            "sessions": sessions,
            "server": {
                "host": state.config.server.host,
                "port": state.config.server.port,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} faqchat v{}",
        style("?").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Content ──").dim());
    println!("  FAQ entries: {}", style(entries).bold());
    println!("  Sessions:    {}", style(sessions).bold());
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style(&database).dim());
    println!(
        "  Server:   {}",
        style(format!(
            "http://{}:{}",
            state.config.server.host, state.config.server.port
        ))
        .dim()
    );
    println!();

    Ok(())
}
