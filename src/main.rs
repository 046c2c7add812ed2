// SPDX-License-Identifier: MPL-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camlog")]
#[command(about = "Lossless per-camera video logger")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record synthetic test-pattern frames into one segment
    Record {
        /// Frame width
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Frame height
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Frame rate
        #[arg(short, long, default_value = "20")]
        fps: u32,

        /// Number of frames to record
        #[arg(short = 'n', long, default_value = "100")]
        frames: u64,

        /// Logical camera channel name
        #[arg(short, long, default_value = "camera0")]
        camera: String,

        /// Output directory (default: resolved storage root)
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },

    /// Print the resolved storage root and defaults
    Info,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camlog=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Record {
            width,
            height,
            fps,
            frames,
            camera,
            directory,
        } => cli::record(width, height, fps, frames, camera, directory),
        Commands::Info => cli::info(),
    }
}
