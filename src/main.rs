//! Command-line entry point: chart inspection and simulated sessions.

use beatlane::input::autoplay;
use beatlane::logic::{self, time::SystemTimeSource, transport::SimulatedTransport};
use beatlane::models::config::{Difficulty, DifficultyPreset};
use beatlane::system::bus::SessionBus;
use beatlane::{FeatureTimeline, GameConfig, GameSession};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "beatlane",
    about = "Generate and play lane charts from audio feature timelines"
)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Difficulty preset overriding the config (easy, normal, hard, expert, master).
    #[arg(long, global = true)]
    difficulty: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the generated chart as JSON.
    Chart {
        /// Feature timeline JSON.
        timeline: PathBuf,

        /// Seed for the random lane modifier.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a real-time session against a simulated transport and print the result.
    Play {
        /// Feature timeline JSON.
        timeline: PathBuf,

        /// Hit every note perfectly.
        #[arg(long)]
        autoplay: bool,

        /// Speed of the simulated transport relative to real time.
        #[arg(long, default_value_t = 1.0)]
        transport_rate: f64,

        /// Track identity reported by the simulated transport (defaults to the file stem).
        #[arg(long)]
        track_id: Option<String>,
    },

    /// Print the default config as TOML.
    DefaultConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("MAIN: Booting beatlane {}", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("MAIN: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref(), args.difficulty.as_deref())?;

    match args.command {
        Command::Chart { timeline, seed } => {
            let timeline = FeatureTimeline::load(&timeline)?;
            let notes = match seed {
                Some(seed) => beatlane::chart::generate_with_rng(
                    &timeline,
                    &config,
                    &mut StdRng::seed_from_u64(seed),
                ),
                None => beatlane::chart::generate(&timeline, &config),
            };
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }
        Command::Play {
            timeline,
            autoplay,
            transport_rate,
            track_id,
        } => play(&timeline, &config, autoplay, transport_rate, track_id)?,
        Command::DefaultConfig => {
            println!("{}", GameConfig::default().to_toml_string()?);
        }
    }
    Ok(())
}

fn load_config(
    path: Option<&Path>,
    difficulty: Option<&str>,
) -> Result<GameConfig, Box<dyn Error>> {
    let mut config = match path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(name) = difficulty {
        let preset: DifficultyPreset = name.parse()?;
        config.difficulty = Difficulty::preset(preset);
    }
    config.validate()?;
    Ok(config)
}

fn play(
    path: &Path,
    config: &GameConfig,
    autoplay: bool,
    transport_rate: f64,
    track_id: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let timeline = FeatureTimeline::load(path)?;
    let track_id = track_id.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    });

    let transport = SimulatedTransport::new(track_id, timeline.track, transport_rate);
    let clock = SystemTimeSource::new();
    let session = GameSession::new(&timeline, config, transport, clock)?;
    let storage_key = session.storage_key().to_string();
    let bus = SessionBus::new();

    if autoplay {
        let inputs = autoplay::schedule(
            session.engine().chart(),
            session.input(),
            f64::from(config.sync_offset_ms),
        );
        autoplay::start_thread(bus.raw_input_tx.clone(), inputs, clock);
    } else {
        log::warn!("MAIN: No input source attached, every note will be missed");
    }

    let handle = logic::start_thread(bus, session);
    let result = handle.join().map_err(|_| "session thread panicked")?;

    match result {
        Some(result) => {
            let report = serde_json::json!({
                "storageKey": storage_key,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => log::warn!("MAIN: Session ended without a result"),
    }
    Ok(())
}
