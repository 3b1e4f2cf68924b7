//! Podium CLI — Command-line interface for sampling and report generation.
//!
//! Usage:
//!   podium sample <VIDEO>      Extract sampled frames from a video
//!   podium report <VIDEO>      Generate a feedback report
//!   podium check               Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "podium",
    about = "Presentation feedback from recorded video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract sampled frames from a video as JPEG files
    Sample {
        /// Path to the video file
        video: PathBuf,

        /// Output directory for frame images
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,

        /// Explicit sampling rate; omit for the adaptive duration-based rate
        #[arg(long)]
        fps: Option<f64>,

        /// JPEG quality for extracted frames (1-100)
        #[arg(long, default_value = "60")]
        quality: u8,
    },

    /// Generate a feedback report from a video and its metric streams
    Report {
        /// Path to the video file
        video: PathBuf,

        /// Facial metrics stream (JSONL, index-aligned with samples)
        #[arg(long)]
        facial: Option<PathBuf>,

        /// Posture metrics stream (JSONL, index-aligned with samples)
        #[arg(long)]
        posture: Option<PathBuf>,

        /// Transcript with per-utterance tone scores (JSON)
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Output report path; defaults to the configured reports directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Explicit sampling rate; omit for the adaptive duration-based rate
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    podium_common::logging::init_logging(&podium_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Sample {
            video,
            output,
            fps,
            quality,
        } => commands::sample::run(video, output, fps, quality).await,
        Commands::Report {
            video,
            facial,
            posture,
            transcript,
            output,
            fps,
        } => commands::report::run(video, facial, posture, transcript, output, fps).await,
        Commands::Check => commands::check::run(),
    }
}
