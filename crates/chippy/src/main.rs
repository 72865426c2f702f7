//! `user-list`: pick people from a catalog into removable chips.
//!
//! Prints the chosen names, one per line, after the UI exits.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chippy::app::{Flags, UserList};
use chippy::widgets::Catalog;
use chippy::{MouseMode, OutputTarget, ProgramOptions};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "user-list", version, about = "Pick people into removable chips")]
struct Cli {
    /// TOML catalog with `[[entry]]` tables (name, email, optional avatar_url).
    /// Defaults to the built-in list of twelve people.
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `chippy_widgets=trace`. `RUST_LOG` wins.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Draw below the prompt instead of on the alternate screen.
    #[arg(long)]
    inline: bool,

    /// Start with mouse capture off; the field is then keyboard-only until
    /// F2 turns it on.
    #[arg(long)]
    no_mouse: bool,

    /// Placeholder shown in the empty field.
    #[arg(long, default_value = "Type to search...")]
    placeholder: String,
}

/// Flushes buffered log lines when dropped.
struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// The UI owns the terminal, so logs only ever go to a file.
fn setup_file_logging(path: &Path, level: &str) -> Result<LogGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {level:?}"))?,
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Ok(LogGuard { _guard: guard })
}

/// Draws on stderr: stdout is reserved for the picked names.
fn program_options(cli: &Cli) -> ProgramOptions {
    ProgramOptions {
        fps: cli.fps,
        alt_screen: !cli.inline,
        mouse_mode: (!cli.no_mouse).then_some(MouseMode::CellMotion),
        title: Some("User List".to_string()),
        output: OutputTarget::Stderr,
        ..ProgramOptions::default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match &cli.log_file {
        Some(path) => Some(setup_file_logging(path, &cli.log_level)?),
        None => None,
    };

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };
    tracing::info!(entries = catalog.len(), "starting user list");

    let options = program_options(&cli);
    let flags = Flags {
        catalog,
        placeholder: cli.placeholder,
        mouse: !cli.no_mouse,
    };

    let list = chippy::run_with::<UserList>(flags, options)
        .await
        .context("user list failed")?;

    for name in list.selected() {
        println!("{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_draws_on_stderr() {
        let options = program_options(&Cli::parse_from(["user-list"]));
        assert_eq!(options.output, OutputTarget::Stderr);
        assert_eq!(options.mouse_mode, Some(MouseMode::CellMotion));
        assert!(options.alt_screen);
    }

    #[test]
    fn flags_map_to_options() {
        let cli = Cli::parse_from(["user-list", "--inline", "--no-mouse", "--fps", "30"]);
        let options = program_options(&cli);
        assert!(!options.alt_screen);
        assert!(options.mouse_mode.is_none());
        assert_eq!(options.fps, 30);
        assert_eq!(options.output, OutputTarget::Stderr);
    }
}
