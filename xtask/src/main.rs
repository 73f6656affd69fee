// Desktop tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]
#![allow(missing_docs)]

mod check;
mod cmd;
mod flash;
mod samples;
mod test;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Haptic bridge development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash firmware to the STM32H7 board via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
        /// Directory of `<id>.wav` samples to link into the image
        #[arg(long)]
        samples: Option<PathBuf>,
    },
    /// Check the hardware build, the no_std crates, clippy and formatting
    Check,
    /// Run host tests
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Validate a sample directory before linking it into the firmware
    Samples {
        /// Directory containing `<id>.wav` files
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release, samples } => {
            if let Some(dir) = samples.as_deref() {
                samples::run(dir)?;
            }
            flash::run(release, samples.as_deref())
        }
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Samples { dir } => samples::run(&dir),
    }
}
