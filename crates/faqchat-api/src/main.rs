//! faqchat CLI and REST API entry point.
//!
//! Binary name: `faqchat`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, FaqCommand, SessionsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "faqchat", &mut std::io::stdout());
        return Ok(());
    }

    let (data_dir, config) = AppState::load_config().await?;

    // Set up tracing based on verbosity; config filter applies only at the default level.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.logging.filter.as_deref().unwrap_or("warn"),
        1 => "info,faqchat=debug",
        _ => "trace",
    };
    faqchat_observe::init_tracing(filter, config.logging.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Initialize application state (DB, services)
    let state = AppState::init(data_dir, config).await?;

    let result = run(cli, state).await;

    faqchat_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Faq { action } => match action {
            FaqCommand::List => cli::faq::list_entries(&state, cli.json).await?,
            FaqCommand::Show { id } => cli::faq::show_entry(&state, &id, cli.json).await?,
            FaqCommand::Import { file } => {
                cli::faq::import_entries(&state, &file, cli.json).await?
            }
            FaqCommand::Delete { id, force } => {
                cli::faq::delete_entry(&state, &id, force, cli.json).await?
            }
            FaqCommand::Clear { force } => {
                cli::faq::clear_entries(&state, force, cli.json).await?
            }
        },

        Commands::Ask { message, session } => {
            cli::chat::ask(&state, &message, session.as_deref(), cli.json).await?;
        }

        Commands::Chat { resume } => {
            cli::chat::run_chat_loop(&state, resume).await?;
        }

        Commands::Transcript { session_id } => {
            cli::session::show_transcript(&state, &session_id, cli.json).await?;
        }

        Commands::Sessions { action, limit } => match action {
            None => cli::session::list_sessions(&state, limit, cli.json).await?,
            Some(SessionsCommand::Delete { session_id, force }) => {
                cli::session::delete_session(&state, &session_id, force, cli.json).await?
            }
        },

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} faqchat API listening on {}",
                    console::style("?").cyan().bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "Server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
