mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::Cli;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use clip_feedback::config::Config;
use clip_feedback::{CopyController, SystemClipboard};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let input = read_input(cli.text.clone())?;
    let content = cli.build_content(input, config.rich_text)?;

    let mut options = config.options().on_success(|content| {
        info!(
            chars = content.text().chars().count(),
            rich = content.is_rich(),
            "Copied"
        )
    });
    if let Some(ms) = cli.duration {
        options = options.with_success_duration(Duration::from_millis(ms));
    }

    let env = Arc::new(SystemClipboard::with_settings(
        config.clipboard_handoff(),
        config.legacy_commands(),
    ));
    let controller = CopyController::with_env(env, options);

    if !controller.copy(content).await {
        let message = controller
            .error()
            .map(|e| e.message())
            .unwrap_or_else(|| "Copy failed".to_string());
        eprintln!("✗ {message}");
        return Ok(ExitCode::FAILURE);
    }

    println!("✓ Copied to clipboard!");

    if cli.wait && controller.has_pending_reset() {
        let mut state = controller.subscribe();
        state
            .wait_for(|s| !s.copied)
            .await
            .context("Copy state closed unexpectedly")?;
        println!("Copied status cleared");
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}

fn read_input(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("Nothing to copy: pass TEXT or pipe content on stdin");
    }

    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}
