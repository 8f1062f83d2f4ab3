// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{crate_version, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sfx_dispatch::audio::mock;
use sfx_dispatch::config::{self, Category};
use sfx_dispatch::dispatch::{Dispatcher, DispatcherSlot, ParentRef, Position};
use sfx_dispatch::util::{duration_seconds, parse_duration};
use sfx_dispatch::verify;

/// The one dispatcher of this process.
static DISPATCHER: DispatcherSlot = DispatcherSlot::new();

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A registry-driven sound dispatcher."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists and verifies all sounds in the given configuration.
    Sounds {
        /// The path to the sounds configuration.
        config_path: String,
        /// Prints the parsed configuration back out as YAML.
        #[arg[long]]
        dump: bool,
    },
    /// Resolves a sound against a mock backend and prints the resulting playbacks.
    Play {
        /// The path to the sounds configuration.
        config_path: String,
        /// The name of the sound to play.
        sound: String,
        /// How many times to play the sound.
        #[arg[short, long, default_value_t = 1]]
        count: usize,
        /// Seed for clip and pitch selection.
        #[arg[short, long]]
        seed: Option<u64>,
        /// Position in the form x,y,z.
        #[arg[short, long]]
        position: Option<String>,
        /// An opaque parent ID to attach the playback to.
        #[arg[long]]
        parent: Option<u64>,
    },
    /// Plays a sound and runs the frame loop, logging disposals and mixer gains.
    Simulate {
        /// The path to the sounds configuration.
        config_path: String,
        /// The names of the sounds to play at the start.
        sounds: Vec<String>,
        /// How long to run the frame loop for.
        #[arg[short, long, default_value = "5s"]]
        duration: String,
        /// The frame length.
        #[arg[short, long, default_value = "16ms"]]
        tick: String,
        /// Sets the music volume (linear) before starting.
        #[arg[long]]
        music_volume: Option<f32>,
        /// Sets the sound effect volume (linear) before starting.
        #[arg[long]]
        sound_effect_volume: Option<f32>,
        /// Sets the other volume (linear) before starting.
        #[arg[long]]
        other_volume: Option<f32>,
    },
}

fn parse_position(position: &str) -> Result<Position, Box<dyn Error>> {
    let coordinates = position
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()?;
    if coordinates.len() != 3 {
        return Err(format!("malformed position '{}', expected x,y,z", position).into());
    }
    Ok(Position::new(coordinates[0], coordinates[1], coordinates[2]))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sounds { config_path, dump } => {
            let config = config::load_sounds(&PathBuf::from(&config_path))?;

            if dump {
                print!("{}", serde_yml::to_string(&config)?);
                return Ok(());
            }

            if config.sounds().is_empty() {
                println!("No sounds found in {}.", config_path);
                return Ok(());
            }

            println!("Sounds (count: {}):", config.sounds().len());
            for sound in config.sounds() {
                let category = sound
                    .category()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "- {} (category: {}, clips: {})",
                    sound.name(),
                    category,
                    sound.clips().join(", ")
                );
            }

            println!();
            let report = verify::verify(&config);
            verify::print_report(&report, &config)?;
            if report.has_errors() {
                return Err("sounds configuration has errors".into());
            }
        }
        Commands::Play {
            config_path,
            sound,
            count,
            seed,
            position,
            parent,
        } => {
            let config = config::load_sounds(&PathBuf::from(&config_path))?;
            let backend = mock::Backend::get("mock-cli");
            let mut dispatcher = Dispatcher::from_config(&config, Arc::new(backend), None)?;
            if let Some(seed) = seed {
                dispatcher = dispatcher.with_seed(seed);
            }
            let dispatcher = DISPATCHER.install(dispatcher);

            let position = match position {
                Some(position) => parse_position(&position)?,
                None => Position::ORIGIN,
            };
            for _ in 0..count {
                let instance = dispatcher.play_at(&sound, position, parent.map(ParentRef))?;
                println!("{}", instance);
            }
        }
        Commands::Simulate {
            config_path,
            sounds,
            duration,
            tick,
            music_volume,
            sound_effect_volume,
            other_volume,
        } => {
            let config = config::load_sounds(&PathBuf::from(&config_path))?;
            let duration = parse_duration("duration", &duration)?;
            let tick = parse_duration("tick", &tick)?;
            if tick.is_zero() {
                return Err("tick must be longer than zero".into());
            }

            let backend = mock::Backend::get("mock-simulator");
            let mixer = mock::Mixer::new();
            let dispatcher = DISPATCHER.install(Dispatcher::from_config(
                &config,
                Arc::new(backend.clone()),
                Some(Arc::new(mixer.clone())),
            )?);

            for (category, volume) in [
                (Category::Music, music_volume),
                (Category::SoundEffect, sound_effect_volume),
                (Category::Other, other_volume),
            ] {
                if let Some(volume) = volume {
                    dispatcher.gains().set(category, volume);
                }
            }

            for sound in &sounds {
                // Failures are already logged by the dispatcher.
                if let Ok(instance) = dispatcher.play(sound) {
                    println!("{}", instance);
                }
            }

            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut disposed = 0;
            while dispatcher.clock() < duration {
                interval.tick().await;
                dispatcher.update(tick);

                let now_disposed = backend.disposed();
                for id in &now_disposed[disposed..] {
                    println!("{} disposed at {}", id, duration_seconds(dispatcher.clock()));
                }
                disposed = now_disposed.len();
            }

            info!(
                live = backend.live_count(),
                pending = dispatcher.pending_disposals(),
                mixer_updates = mixer.push_count(),
                "Simulation finished"
            );
            println!(
                "Finished at {}: {} live, {} pending disposal(s).",
                duration_seconds(dispatcher.clock()),
                backend.live_count(),
                dispatcher.pending_disposals()
            );
        }
    }

    Ok(())
}
