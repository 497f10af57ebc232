//! Skycast Entry Point
//!
//! Launches the weather widget in the terminal, or headless over stdin/stdout.
//!
//! Usage:
//!   skycast [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Config file (default: ~/.config/skycast/skycast.toml)
//!   --api-key <KEY>   OpenWeather API key
//!   --units <UNITS>   metric | imperial | standard
//!   --headless        Read JSON messages from stdin, print state snapshots

use std::io;
use std::panic;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skycast_core::{config, OpenWeatherLookup, SkycastConfig, Units};
use skycast_tui::{headless, App};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather lookups in your terminal")]
struct Args {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// OpenWeather API key (overrides config file and environment)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Unit system: metric, imperial or standard
    #[arg(long, value_name = "UNITS")]
    units: Option<Units>,

    /// Run without a terminal, reading JSON messages from stdin
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so headless stdout stays pure JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let lookup = OpenWeatherLookup::from_config(&config.lookup)?;
    if !lookup.has_api_key() {
        tracing::warn!("No API key configured; lookups will fail until one is set");
    }
    let initial = config.initial_state();

    if args.headless {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        headless::run(lookup, initial, stdin, &mut stdout).await?;
        return Ok(());
    }

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: skycast requires a terminal (TTY)");
        eprintln!();
        eprintln!("Use --headless to drive it from piped JSON messages instead.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(lookup, initial);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Config file, then environment, then CLI flags
fn resolve_config(args: &Args) -> anyhow::Result<SkycastConfig> {
    let path = args.config.clone().or_else(config::default_config_path);
    let mut config = config::load_config_from_path(path)?;

    if let Some(ref key) = args.api_key {
        config.set_cli_api_key(key.clone());
    }
    if let Some(units) = args.units {
        config.lookup.units = units;
    }

    tracing::info!(
        api_key_source = %config.api_key_source(),
        units = config.lookup.units.as_query(),
        "Starting skycast"
    );
    Ok(config)
}
