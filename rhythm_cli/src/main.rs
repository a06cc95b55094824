mod simulate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rhythm_core::chart::{load_song, BuildOptions, SongChart};
use rhythm_core::SessionConfig;

#[derive(Debug, Parser)]
#[command(name = "rhythm")]
#[command(about = "Rhythm chart and judgment tools", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build per-lane charts from a note dump and print their timestamps.
    Chart {
        input: PathBuf,
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail when a lane has no notes.
        #[arg(long)]
        require_notes: bool,
    },
    /// Play a note dump against scripted input and report the judgments.
    Simulate {
        input: PathBuf,
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        inputs: PathBuf,
        /// Tick length in seconds.
        #[arg(long, default_value_t = 0.01)]
        tick: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::Chart {
            input,
            config,
            output,
            require_notes,
        } => {
            let config = load_config(&config)?;
            let song = load(&input, &config, BuildOptions { require_notes })?;

            let json = serde_json::to_string_pretty(&song).context("failed to serialize charts")?;
            match output {
                Some(out_path) => fs::write(&out_path, json)
                    .with_context(|| format!("failed to write: {}", out_path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Simulate {
            input,
            config,
            inputs,
            tick,
        } => {
            let config = load_config(&config)?;
            let song = load(&input, &config, BuildOptions::default())?;
            let script = simulate::load_inputs(&inputs)?;
            simulate::run_simulation(song, config, &script, tick)?;
        }
    }

    Ok(())
}

fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

fn load_config(path: &Path) -> anyhow::Result<SessionConfig> {
    SessionConfig::load(path).with_context(|| format!("invalid config: {}", path.display()))
}

fn load(input: &Path, config: &SessionConfig, options: BuildOptions) -> anyhow::Result<SongChart> {
    load_song(input, config, options).with_context(|| format!("failed to load chart: {}", input.display()))
}
