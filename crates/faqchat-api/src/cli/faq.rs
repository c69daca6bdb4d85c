//! FAQ entry CLI commands: list, show, import, delete, clear.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use serde::Deserialize;

use faqchat_types::faq::{BulkFaqRequest, EntryId, FaqEntryRequest};

use crate::state::AppState;

/// Import file shape: the bulk request object or a bare array of entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Bulk(BulkFaqRequest),
    Items(Vec<FaqEntryRequest>),
}

/// Parse the contents of an import file.
pub fn parse_import(content: &str) -> Result<BulkFaqRequest> {
    let parsed: ImportFile =
        serde_json::from_str(content).context("Import file is not a valid FAQ list")?;
    Ok(match parsed {
        ImportFile::Bulk(bulk) => bulk,
        ImportFile::Items(items) => BulkFaqRequest { items },
    })
}

fn parse_id(raw: &str) -> Result<EntryId> {
    raw.parse()
        .with_context(|| format!("'{raw}' is not a valid entry id"))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// List every entry in match order.
pub async fn list_entries(state: &AppState, json: bool) -> Result<()> {
    let entries = state.faq_service.list_entries().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No FAQ entries yet. Import some with: {}",
            style("i").blue().bold(),
            style("faqchat faq import <file.json>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Query").fg(Color::White),
        Cell::new("Response").fg(Color::White),
        Cell::new("Options").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            Cell::new(truncate(&entry.query, 40)).fg(Color::Cyan),
            Cell::new(truncate(&entry.response, 50)),
            Cell::new(entry.options.len()).fg(Color::White),
            Cell::new(entry.id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} entr{}",
        style(entries.len()).bold(),
        if entries.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}

/// Show one entry with its options.
pub async fn show_entry(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let entry = state
        .faq_service
        .get_entry(&id)
        .await
        .with_context(|| format!("Entry '{id}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Query:").bold(), style(&entry.query).cyan().bold());
    println!("  {} {}", style("Response:").bold(), entry.response);
    println!("  {} {}", style("ID:").bold(), style(entry.id).dim());

    if !entry.options.is_empty() {
        println!();
        println!("  {}", style("── Options ──").dim());
        for option in &entry.options {
            println!(
                "  {} {} {} {}",
                style(format!("[{}]", option.sub_id)).dim(),
                style(&option.option_text).yellow(),
                style("→").dim(),
                option.response
            );
        }
    }
    println!();

    Ok(())
}

/// Import entries from a JSON file. All or nothing.
pub async fn import_entries(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let bulk = parse_import(&content)?;

    let created = state.faq_service.create_many(bulk).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        println!(
            "  {} Imported {} entr{} from {}",
            style("✓").green().bold(),
            style(created.len()).bold(),
            if created.len() == 1 { "y" } else { "ies" },
            style(file.display()).dim()
        );
    }

    Ok(())
}

/// Delete one entry, asking first unless `force`.
pub async fn delete_entry(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let entry = state
        .faq_service
        .get_entry(&id)
        .await
        .with_context(|| format!("Entry '{id}' not found"))?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete entry '{}'?",
                style(&entry.query).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.faq_service.delete_entry(&id).await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": true, "id": id }));
    } else {
        println!(
            "  {} Entry '{}' deleted.",
            style("✓").red().bold(),
            entry.query
        );
    }

    Ok(())
}

/// Delete every entry, asking first unless `force`.
pub async fn clear_entries(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let count = state.faq_service.count().await?;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete all {} FAQ entries?",
                style(count).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let deleted = state.faq_service.delete_all().await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        println!(
            "  {} Deleted {} entr{}.",
            style("✓").red().bold(),
            deleted,
            if deleted == 1 { "y" } else { "ies" }
        );
    }

    Ok(())
}
