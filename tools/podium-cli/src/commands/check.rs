//! Check system capabilities.

use podium_common::config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    println!("Podium System Check");
    println!("{}", "=".repeat(50));

    if podium_frame_sampler::backend_available() {
        println!("[OK] Decode backend: ffmpeg + ffprobe found in PATH");
    } else {
        println!("[FAIL] Decode backend: ffmpeg and/or ffprobe missing from PATH");
    }

    let config = AppConfig::load();
    println!("[OK] Reports directory: {}", config.reports_dir.display());
    match config.analysis.sample_fps {
        Some(fps) => println!("[OK] Sampling rate: fixed at {fps} FPS"),
        None => println!("[OK] Sampling rate: adaptive (duration-based)"),
    }
    println!(
        "[OK] Key-frame JPEG quality: {}",
        config.analysis.keyframe_jpeg_quality
    );
    println!(
        "[OK] Ideal pacing band: {}-{} WPM",
        config.analysis.ideal_wpm_low, config.analysis.ideal_wpm_high
    );

    println!();
    if podium_frame_sampler::backend_available() {
        println!("All required capabilities are available. Podium is ready.");
    } else {
        println!("Install ffmpeg (which provides ffprobe) to enable video analysis.");
    }

    Ok(())
}
