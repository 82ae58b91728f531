// Host tooling: unwrap/expect/panic acceptable outside the firmware.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod flash;
mod play;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "WM8731 WAV player development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash firmware to the STM32H743 board via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Play a WAV file on the desktop through the emulated frame port
    Play {
        /// Directory holding the WAV file, passed as MUSIC_PATH
        #[arg(long)]
        music_path: Option<std::path::PathBuf>,
        /// File to play (defaults to SOUND.WAV)
        file: Option<String>,
        /// Re-run whenever a source file changes
        #[arg(long)]
        watch: bool,
    },
    /// Check firmware builds for both hardware and emulator targets
    Check,
    /// Run unit and integration tests
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Play {
            music_path,
            file,
            watch,
        } => play::run(music_path.as_deref(), file.as_deref(), watch),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
