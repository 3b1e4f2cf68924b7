//! Extract sampled frames from a video.

use std::path::PathBuf;

use podium_analysis_core::compress::compress_jpeg;
use podium_frame_sampler::{FfmpegDecoder, FrameSampler};

pub async fn run(
    video: PathBuf,
    output: PathBuf,
    fps: Option<f64>,
    quality: u8,
) -> anyhow::Result<()> {
    println!("Sampling video: {}", video.display());

    let decoder = FfmpegDecoder::open(&video)
        .map_err(|e| anyhow::anyhow!("Failed to open video: {e}"))?;
    let mut sampler = FrameSampler::new(decoder).with_fps_override(fps);

    let plan = sampler
        .plan()
        .map_err(|e| anyhow::anyhow!("Failed to probe video: {e}"))?;
    println!(
        "  Duration: {:.1}s, sampling at {} FPS ({} frames)",
        plan.duration_secs,
        plan.fps,
        plan.sample_count()
    );

    std::fs::create_dir_all(&output)?;

    let out_dir = output.clone();
    let summary = sampler
        .stream(|sampled| {
            let path = out_dir.join(format!("frame_{:05}.jpg", sampled.frame.index));
            async move {
                let jpeg = compress_jpeg(&sampled.frame, quality)?;
                tokio::fs::write(&path, jpeg).await?;
                Ok(())
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("Sampling failed: {e}"))?;

    println!(
        "  Wrote {} frames to {} ({} skipped)",
        summary.frames_delivered,
        output.display(),
        summary.frames_skipped
    );
    println!("\nSampling complete.");

    Ok(())
}
