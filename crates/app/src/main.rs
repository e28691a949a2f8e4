use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tuner_metronome_core::{
    parse_json_script, parse_script, AppConfig, InputEvent, JsonFileStore, SavedTempo,
    ScreenController, SimulatedScreen,
};

fn main() -> tuner_metronome_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.store)?;

    match cli.command {
        Commands::Run { script } => run_script(&config, &script),
        Commands::Interactive => run_interactive(&config),
        Commands::Saved => show_saved(&config),
    }
}

fn load_config(
    path: Option<&Path>,
    store_override: Option<PathBuf>,
) -> tuner_metronome_core::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(store) = store_override {
        config.store.path = store.to_string_lossy().into_owned();
    }
    Ok(config)
}

fn open_screen(
    config: &AppConfig,
) -> tuner_metronome_core::Result<SimulatedScreen<JsonFileStore>> {
    let store = JsonFileStore::open(&config.store.path)?;
    let mut screen = ScreenController::simulated(config, store);
    screen.on_load();
    screen.on_activate();
    Ok(screen)
}

fn run_script(config: &AppConfig, script: &Path) -> tuner_metronome_core::Result<()> {
    tracing::info!(?script, "replaying input script");

    let raw = std::fs::read_to_string(script)?;
    let events = if script.extension().is_some_and(|ext| ext == "json") {
        parse_json_script(&raw)?
    } else {
        parse_script(&raw)?
    };

    let mut screen = open_screen(config)?;
    for event in &events {
        screen.handle(*event)?;
    }
    tracing::info!(events = events.len(), "script finished");

    println!("{}", status_line(&screen));
    println!("{}", screen.panel());
    Ok(())
}

fn run_interactive(config: &AppConfig) -> tuner_metronome_core::Result<()> {
    let mut screen = open_screen(config)?;
    let mut last_event = Instant::now();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", status_line(&screen));
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        // Held buttons keep ticking while the user types.
        let now = Instant::now();
        screen.advance(now.duration_since(last_event));
        last_event = now;

        match line.parse::<InputEvent>() {
            Ok(event) => screen.handle(event)?,
            Err(err) => tracing::warn!(%err, "ignoring input"),
        }
        println!("{}", status_line(&screen));
        stdout.flush()?;
    }

    screen.on_back();
    Ok(())
}

fn show_saved(config: &AppConfig) -> tuner_metronome_core::Result<()> {
    let store = JsonFileStore::open(&config.store.path)?;
    let mut saved = SavedTempo::new(config.store.key.clone());
    let bpm = saved.load(&store);
    if saved.is_set() {
        println!("{bpm}");
    } else {
        println!("no tempo saved in {}", store.path().display());
    }
    Ok(())
}

fn status_line(screen: &SimulatedScreen<JsonFileStore>) -> String {
    let mode = screen
        .mode()
        .map_or_else(|| "off".to_string(), |mode| mode.to_string());
    format!(
        "mode={mode} tempo={} saved={} sound={} holding={}",
        screen.current_tempo(),
        screen.saved_bpm(),
        screen.sound(),
        screen.is_holding()
    )
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Metronome and tuner practice screen", long_about = None)]
struct Cli {
    /// JSON configuration file; built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Settings file holding the saved tempo. Overrides the configuration.
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a script of input events and print the final screen state.
    Run {
        /// Text script (one event per line) or a `.json` array of events.
        script: PathBuf,
    },
    /// Read input events from stdin, ticking held buttons in real time.
    Interactive,
    /// Print the persisted saved tempo.
    Saved,
}
