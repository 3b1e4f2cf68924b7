//! Video decode backends.
//!
//! The sampler talks to a `FrameDecoder` trait so tests can substitute a
//! synthetic decoder. The shipping backend shells out to ffmpeg/ffprobe,
//! which keeps the crate free of codec bindings.

use std::path::{Path, PathBuf};
use std::process::Command;

use podium_common::error::{PodiumError, PodiumResult};
use podium_session_model::frame::VideoFrame;

/// Trait for a video decode substrate.
pub trait FrameDecoder: Send {
    /// Total duration of the video in seconds.
    ///
    /// Fails with `VideoRead` when the file is unreadable or carries no
    /// video track; that failure is fatal to sampling.
    fn duration_secs(&mut self) -> PodiumResult<f64>;

    /// Decode a single frame at the given timestamp.
    ///
    /// A failure here is skippable: the sampler logs it and continues.
    fn decode_at(&mut self, index: usize, timestamp_secs: f64) -> PodiumResult<VideoFrame>;
}

/// ffmpeg/ffprobe subprocess decoder.
#[derive(Debug)]
pub struct FfmpegDecoder {
    path: PathBuf,
    probed: Option<ProbeInfo>,
}

#[derive(Debug, Clone, Copy)]
struct ProbeInfo {
    duration_secs: f64,
    width: u32,
    height: u32,
}

impl FfmpegDecoder {
    /// Create a decoder for the given video file.
    ///
    /// Fails fast when the file does not exist or ffmpeg/ffprobe are not
    /// on PATH; probing is deferred to the first `duration_secs` call.
    pub fn open(path: impl AsRef<Path>) -> PodiumResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(PodiumError::FileNotFound { path });
        }
        if !command_exists("ffprobe") || !command_exists("ffmpeg") {
            return Err(PodiumError::unsupported(
                "No supported decode backend found (expected ffmpeg and ffprobe in PATH)",
            ));
        }
        Ok(Self { path, probed: None })
    }

    fn probe(&mut self) -> PodiumResult<ProbeInfo> {
        if let Some(info) = self.probed {
            return Ok(info);
        }

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height:format=duration",
                "-of",
                "csv=p=0",
            ])
            .arg(&self.path)
            .output()
            .map_err(|e| PodiumError::video_read(format!("Failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(PodiumError::video_read(format!(
                "ffprobe failed for {}: {}",
                self.path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        // First line: "width,height" for the video stream; second line:
        // "duration" for the container. A file with no video track
        // produces no stream line.
        let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty());
        let stream_line = lines
            .next()
            .ok_or_else(|| PodiumError::video_read("Video contains no video track"))?;
        let (w, h) = stream_line
            .split_once(',')
            .ok_or_else(|| PodiumError::video_read("Unexpected ffprobe stream output"))?;
        let width: u32 = w
            .parse()
            .map_err(|_| PodiumError::video_read(format!("Invalid stream width: {w}")))?;
        let height: u32 = h
            .trim_end_matches(',')
            .parse()
            .map_err(|_| PodiumError::video_read(format!("Invalid stream height: {h}")))?;

        let duration_line = lines
            .next()
            .ok_or_else(|| PodiumError::video_read("ffprobe reported no container duration"))?;
        let duration_secs: f64 = duration_line.parse().map_err(|_| {
            PodiumError::video_read(format!("Invalid container duration: {duration_line}"))
        })?;
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(PodiumError::video_read(format!(
                "Container duration out of range: {duration_secs}"
            )));
        }

        let info = ProbeInfo {
            duration_secs,
            width,
            height,
        };
        tracing::debug!(
            path = %self.path.display(),
            duration_secs,
            width,
            height,
            "Probed video"
        );
        self.probed = Some(info);
        Ok(info)
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn duration_secs(&mut self) -> PodiumResult<f64> {
        Ok(self.probe()?.duration_secs)
    }

    fn decode_at(&mut self, index: usize, timestamp_secs: f64) -> PodiumResult<VideoFrame> {
        let info = self.probe()?;

        // -ss before -i seeks on the demuxer, which is fast enough for
        // one-frame extraction at arbitrary timestamps.
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-ss"])
            .arg(format!("{timestamp_secs:.6}"))
            .arg("-i")
            .arg(&self.path)
            .args([
                "-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgb24", "-",
            ])
            .output()
            .map_err(|e| {
                PodiumError::decode(timestamp_secs, format!("Failed to run ffmpeg: {e}"))
            })?;

        if !output.status.success() {
            return Err(PodiumError::decode(
                timestamp_secs,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let frame = VideoFrame {
            index,
            width: info.width,
            height: info.height,
            data: output.stdout,
        };
        if !frame.is_well_formed() {
            return Err(PodiumError::decode(
                timestamp_secs,
                format!(
                    "Decoded buffer length {} does not match {}x{} rgb24",
                    frame.data.len(),
                    info.width,
                    info.height
                ),
            ));
        }
        Ok(frame)
    }
}

/// Whether the ffmpeg/ffprobe subprocess backend is usable on this system.
pub fn backend_available() -> bool {
    command_exists("ffprobe") && command_exists("ffmpeg")
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_fatal() {
        let err = FfmpegDecoder::open("/nonexistent/talk.mp4").unwrap_err();
        assert!(matches!(err, PodiumError::FileNotFound { .. }));
    }
}
