use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskdeck::agent::LocalAgent;
use taskdeck::checkpoint::CheckpointStore;
use taskdeck::config::Config;
use taskdeck::tui;

/// Terminal console for background coding agents.
#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about)]
struct Cli {
    /// Checkpoint directory (overrides the config file).
    #[arg(long)]
    checkpoints: Option<std::path::PathBuf>,

    /// Picker window size (overrides the config file).
    #[arg(long)]
    window: Option<usize>,

    /// Hide the ▲/▼ scroll affordances in pickers.
    #[arg(long)]
    no_arrows: bool,

    /// Serve the tool protocol on stdin/stdout instead of the TUI.
    #[arg(long)]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to a file: stdout belongs to the TUI.
    let log_dir = taskdeck::config::home_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("taskdeck.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskdeck=info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(dir) = cli.checkpoints {
        config.checkpoint_dir = Some(dir);
    }
    if let Some(window) = cli.window {
        config.picker.window_size = window.max(1);
    }
    if cli.no_arrows {
        config.picker.scroll_arrows = false;
    }

    let agent = Arc::new(LocalAgent::new());
    let store = CheckpointStore::new(config.checkpoint_dir()?);

    if cli.serve {
        return serve(agent).await;
    }
    tui::runner::run(config, agent, store).await
}

/// Line-delimited JSON protocol over stdin/stdout.
async fn serve(agent: Arc<LocalAgent>) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let server = taskdeck::server::ToolServer::new(agent);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = server.handle_line(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}
