use std::{
    env,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    sync::{Arc, LazyLock},
};

use airspace_state_rs::{
    AirspaceConfig, AirspaceStore, Perturber, SimulationConfig, spawn_background,
};
use anyhow::Context;
use atc_transcript_rs::{
    CallsignMode, ExtractorConfig, FieldCoverage, FieldExtractor, compare_modes,
};
use aviation_helper_rs::clearance::airlines::{AirlineTable, Airlines};
use clap::Parser;
use cli::{Cli, Commands};
use log::{info, warn};
use session::Session;

mod cli;
mod session;

pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(AppConfig::from_env);

#[derive(Debug, Clone)]
pub struct AppConfig {
    extractor_config: Option<PathBuf>,
    airspace_config: Option<PathBuf>,
    airlines: Option<PathBuf>,
    seed: Option<u64>,
    synthesize_missing: bool,
}

impl AppConfig {
    fn from_env() -> Self {
        let path = |key: &str| env::var_os(key).map(PathBuf::from);
        let seed = env::var("ATC_SEED").ok().and_then(|seed| seed.parse().ok());
        let synthesize_missing = env::var("ATC_SYNTHESIZE").as_deref() == Ok("1");
        Self {
            extractor_config: path("ATC_EXTRACTOR_CONFIG"),
            airspace_config: path("ATC_AIRSPACE_CONFIG"),
            airlines: path("ATC_AIRLINES"),
            seed,
            synthesize_missing,
        }
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let extractor = load_extractor()?;

    match cli.command {
        Commands::Interpret {
            transcripts,
            baseline,
        } => {
            let mode = callsign_mode(baseline);
            for transcript in &transcripts {
                let parsed = extractor.parse(transcript, mode);
                println!("{}", serde_json::to_string(&parsed)?);
            }
        }
        Commands::Compare { file } => {
            let reader = BufReader::new(
                File::open(&file).with_context(|| format!("Could not open {}", file.display()))?,
            );
            let mut coverage = FieldCoverage::default();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let comparison = compare_modes(&extractor, &line);
                coverage.add(&comparison);
                println!("{}", serde_json::to_string(&comparison)?);
            }
            println!("{}", serde_json::to_string(&coverage)?);
        }
        Commands::Session { simulate, baseline } => {
            run_session(extractor, simulate, callsign_mode(baseline))?;
        }
    }
    Ok(())
}

fn callsign_mode(baseline: bool) -> CallsignMode {
    if baseline {
        CallsignMode::Baseline
    } else {
        CallsignMode::Enhanced
    }
}

fn run_session(extractor: FieldExtractor, simulate: bool, mode: CallsignMode) -> anyhow::Result<()> {
    let mut config = load_airspace_config()?;
    if let Some(seed) = APP_CONFIG.seed {
        config.simulation.seed = seed;
    }
    let store = Arc::new(AirspaceStore::new());
    let mut session = Session::new(extractor, store.clone(), &config);

    if simulate || APP_CONFIG.synthesize_missing || config.simulation.synthesize_missing {
        session = session.with_synthesis(Perturber::seeded(config.simulation));
    }
    // Different stream than the synthesizer so the two do not mirror each other
    let background = if simulate {
        let simulation = config.simulation;
        let perturber = Perturber::seeded(SimulationConfig {
            seed: simulation.seed.wrapping_add(1),
            ..simulation
        });
        Some(spawn_background(store, perturber)?)
    } else {
        None
    };

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = session.ingest(&line, mode, chrono::Utc::now());
        println!("{}", serde_json::to_string(&outcome)?);
    }

    if let Some(background) = background {
        background.stop();
    }
    Ok(())
}

fn load_extractor() -> anyhow::Result<FieldExtractor> {
    let config = match &APP_CONFIG.extractor_config {
        Some(path) => ExtractorConfig::load_from_file(path)
            .with_context(|| format!("Could not load extractor config {}", path.display()))?,
        None => ExtractorConfig::load_default().unwrap_or_else(|err| {
            warn!("Bundled extractor config unavailable ({err}), using defaults");
            ExtractorConfig::default()
        }),
    };

    let airlines = match &APP_CONFIG.airlines {
        Some(path) => AirlineTable::with_airlines(&load_airlines(path)?),
        None => match Airlines::load_airlines_from_file() {
            Ok(airlines) => AirlineTable::with_airlines(&airlines),
            Err(err) => {
                warn!("Bundled airline table unavailable ({err}), using built-in prefixes");
                AirlineTable::builtin()
            }
        },
    };
    info!("Loaded {} airline callsigns", airlines.len());

    Ok(FieldExtractor::new(&config, airlines))
}

fn load_airlines(path: &Path) -> anyhow::Result<Airlines> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    Airlines::load_airlines(BufReader::new(file))
        .with_context(|| format!("Could not parse airlines {}", path.display()))
}

fn load_airspace_config() -> anyhow::Result<AirspaceConfig> {
    match &APP_CONFIG.airspace_config {
        Some(path) => AirspaceConfig::load_from_file(path)
            .with_context(|| format!("Could not load airspace config {}", path.display())),
        None => Ok(AirspaceConfig::load_default().unwrap_or_else(|err| {
            warn!("Bundled airspace config unavailable ({err}), using defaults");
            AirspaceConfig::default()
        })),
    }
}
