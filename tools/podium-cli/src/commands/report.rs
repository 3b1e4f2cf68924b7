//! Generate a feedback report from a video and its metric streams.

use std::path::{Path, PathBuf};

use podium_analysis_core::{build_report, ReportConfig, ReportInputs, SpeechSummary};
use podium_common::config::AppConfig;
use podium_frame_sampler::{FfmpegDecoder, FrameSampler};
use podium_session_model::frame::{
    parse_facial_frames, parse_posture_frames, FacialFrame, PostureFrame,
};
use podium_session_model::transcript::Transcript;

pub async fn run(
    video: PathBuf,
    facial: Option<PathBuf>,
    posture: Option<PathBuf>,
    transcript: Option<PathBuf>,
    output: Option<PathBuf>,
    fps: Option<f64>,
) -> anyhow::Result<()> {
    println!("Analyzing video: {}", video.display());

    let config = AppConfig::load();

    let facial_frames = match &facial {
        Some(path) => load_facial(path)?,
        None => Vec::new(),
    };
    let posture_frames = match &posture {
        Some(path) => load_posture(path)?,
        None => Vec::new(),
    };
    println!(
        "  Loaded {} facial and {} posture records",
        facial_frames.len(),
        posture_frames.len()
    );

    let speech = match &transcript {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|_| anyhow::anyhow!("Transcript not found: {}", path.display()))?;
            let parsed: Transcript = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse transcript: {e}"))?;
            let summary = SpeechSummary::from_transcript(&parsed);
            match &summary {
                Some(s) => println!("  Transcript: {} words at {:.0} WPM", s.word_count, s.wpm),
                None => println!("  Transcript carries no measurable speech"),
            }
            summary
        }
        None => None,
    };

    let decoder = FfmpegDecoder::open(&video)
        .map_err(|e| anyhow::anyhow!("Failed to open video: {e}"))?;
    let mut sampler =
        FrameSampler::new(decoder).with_fps_override(fps.or(config.analysis.sample_fps));
    let (sampled, summary) = sampler
        .collect()
        .await
        .map_err(|e| anyhow::anyhow!("Sampling failed: {e}"))?;
    println!(
        "  Sampled {} frames at {} FPS ({} skipped)",
        summary.frames_delivered, summary.fps, summary.frames_skipped
    );

    let frames: Vec<_> = sampled.into_iter().map(|s| s.frame).collect();
    let inputs = ReportInputs {
        facial: &facial_frames,
        posture: &posture_frames,
        frames: &frames,
        duration_secs: summary.duration_secs,
        frame_interval_secs: summary.interval_secs,
        speech,
    };
    let report = build_report(
        &inputs,
        &ReportConfig {
            jpeg_quality: config.analysis.keyframe_jpeg_quality,
        },
    );

    print_scores(&report);

    let output_path = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&config.reports_dir)?;
            let stem = video
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "session".to_string());
            config.reports_dir.join(format!("{stem}.report.json"))
        }
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&output_path, json)?;
    println!("\nReport written to: {}", output_path.display());

    Ok(())
}

fn load_facial(path: &Path) -> anyhow::Result<Vec<FacialFrame>> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| anyhow::anyhow!("Facial metrics not found: {}", path.display()))?;
    parse_facial_frames(&content).map_err(|e| anyhow::anyhow!("Failed to parse facial metrics: {e}"))
}

fn load_posture(path: &Path) -> anyhow::Result<Vec<PostureFrame>> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| anyhow::anyhow!("Posture metrics not found: {}", path.display()))?;
    parse_posture_frames(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse posture metrics: {e}"))
}

fn print_scores(report: &podium_session_model::metrics::SessionMetrics) {
    println!();
    println!("  Scores:");
    print_score("Facial expression", report.facial_score);
    print_score("Posture", report.posture_score);
    print_score("Eye contact", report.eye_contact_score);
    println!("    Body language      {}", report.gesture_score);
    print_score("Pacing", report.pacing_score);
    print_score("Tone", report.tone_score);
    println!("  Key frames: {}", report.key_frames.len());
    for kf in &report.key_frames {
        println!(
            "    [{}] t={:.1}s {} ({})",
            if kf.is_positive { "+" } else { "-" },
            kf.timestamp_secs,
            kf.primary_metric,
            kf.score
        );
    }
}

fn print_score(label: &str, score: Option<podium_session_model::metrics::ModalityScore>) {
    match score {
        Some(s) => println!("    {label:<18} {s}"),
        None => println!("    {label:<18} insufficient data"),
    }
}
