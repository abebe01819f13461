//! rinkaudio - contextual hockey audio
//!
//! Loads the sound catalog, then replays recorded host events through the
//! collision classifier for headless runs.

mod config;
mod replay;
mod system;

use anyhow::Result;
use config::RinkAudioConfig;
use replay::EventScript;
use rinkaudio_audio::{open_default_sink, NullSink, PlaybackSink, ResourceDir, SoundCategory};
use rinkaudio_testkit::JsonlSink;
use std::{env, path::PathBuf};
use system::SoundSystem;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting rinkaudio v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.show_help {
        print_usage();
        return Ok(());
    }

    let mut config = match cli.config_path.as_deref() {
        Some(path) => RinkAudioConfig::load_from_path(path),
        None => RinkAudioConfig::load(),
    };
    if let Some(root) = cli.resource_root.clone() {
        config.assets.resource_root = root;
    }
    if let Some(dir) = cli.external_dir.clone() {
        config.assets.external_dir = Some(dir);
    }
    if let Some(seed) = cli.seed {
        config.startup.rng_seed = Some(seed);
    }
    if cli.log_path.is_some() && cli.events_path.is_none() {
        tracing::error!("--log requires --events");
    }

    let resources = ResourceDir::new(config.assets.resource_root.clone());
    let mut system = SoundSystem::new();
    let summary = if cli.no_audio {
        system.initialize(&config, &resources, || {
            Ok(Box::new(NullSink) as Box<dyn PlaybackSink>)
        })
    } else {
        system.initialize(&config, &resources, open_default_sink)
    };
    match summary {
        Some(summary) if summary.failed() > 0 => warn!(
            failed = summary.failed(),
            "Some sounds failed to load from {}",
            resources.root().display()
        ),
        Some(summary) => info!(
            loaded = summary.loaded,
            root = %resources.root().display(),
            "Sound catalog loaded"
        ),
        None => warn!("Running without sound"),
    }

    if cli.preview {
        print_preview(&mut system);
    }

    if let Some(events_path) = cli.events_path.as_deref() {
        let script = EventScript::from_path(events_path)?;
        info!(
            events = script.events().len(),
            path = %events_path.display(),
            "Loaded event script"
        );
        let mut log = match cli.log_path.as_deref() {
            Some(path) => Some(JsonlSink::create(path)?),
            None => None,
        };
        let stats = script.replay(&mut system, log.as_mut())?;
        println!(
            "replayed {} events over {} ticks, {} cues played",
            stats.events, stats.ticks, stats.cues
        );
    }

    system.shutdown();
    Ok(())
}

fn print_usage() {
    println!(
        "usage: rinkaudio [--config <file.toml>] [--events <file.json>] [--log <out.jsonl>]\n\
         \x20                [--assets <dir>] [--external-sounds <dir>] [--seed <n>] [--no-audio]\n\
         \x20                [--preview]"
    );
}

/// Print one randomly chosen clip per category.
fn print_preview(system: &mut SoundSystem) {
    if !system.is_initialized() {
        println!("sound system not running, nothing to preview");
        return;
    }
    for category in SoundCategory::ALL {
        let loaded = system
            .manager()
            .map_or(0, |manager| manager.count(category));
        match system.random_clip(category) {
            Some(clip) => {
                let format = clip.format();
                println!(
                    "{:<22} {loaded} loaded, picked {:.2}s at {} Hz, {} ch, {}-bit",
                    category.name(),
                    clip.duration_secs(),
                    format.sample_rate,
                    format.channels,
                    format.bits_per_sample
                );
            }
            None => println!("{:<22} no loaded variants", category.name()),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    show_help: bool,
    no_audio: bool,
    preview: bool,
    config_path: Option<PathBuf>,
    events_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    resource_root: Option<PathBuf>,
    external_dir: Option<PathBuf>,
    seed: Option<u64>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => opts.show_help = true,
                "--no-audio" => opts.no_audio = true,
                "--preview" => opts.preview = true,
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--events" => {
                    if let Some(path) = args.next() {
                        opts.events_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--events requires a file path");
                    }
                }
                "--log" => {
                    if let Some(path) = args.next() {
                        opts.log_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--log requires a file path");
                    }
                }
                "--assets" => {
                    if let Some(path) = args.next() {
                        opts.resource_root = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--assets requires a directory path");
                    }
                }
                "--external-sounds" => {
                    if let Some(path) = args.next() {
                        opts.external_dir = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--external-sounds requires a directory path");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                other => {
                    warn!(arg = other, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}
