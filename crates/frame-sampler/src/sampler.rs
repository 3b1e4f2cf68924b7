//! Streaming and batch frame sampling.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use podium_common::error::{PodiumError, PodiumResult};
use podium_session_model::frame::VideoFrame;

use crate::decoder::FrameDecoder;
use crate::rate::SamplingPlan;

/// Cooperative cancellation signal, checked between frame decodes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A decoded frame with its sample timestamp.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Position in the video, seconds.
    pub timestamp_secs: f64,

    /// The decoded frame buffer.
    pub frame: VideoFrame,
}

/// Outcome of a sampling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingSummary {
    /// Frames delivered to the sink.
    pub frames_delivered: usize,

    /// Timestamps skipped due to decode failures.
    pub frames_skipped: usize,

    /// Effective sampling rate used.
    pub fps: f64,

    /// Interval between samples in seconds.
    pub interval_secs: f64,

    /// Video duration in seconds.
    pub duration_secs: f64,
}

/// Samples a video at the adaptive rate, producing a lazy, finite,
/// non-restartable sequence of timestamped frames.
pub struct FrameSampler<D: FrameDecoder> {
    decoder: D,
    fps_override: Option<f64>,
    cancel: CancelToken,
}

impl<D: FrameDecoder> FrameSampler<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            fps_override: None,
            cancel: CancelToken::new(),
        }
    }

    /// Force an explicit sampling rate instead of the duration-based table.
    pub fn with_fps_override(mut self, fps: Option<f64>) -> Self {
        self.fps_override = fps;
        self
    }

    /// Get a clone of the cancel token for use by other tasks.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Resolve the sampling plan without decoding anything.
    pub fn plan(&mut self) -> PodiumResult<SamplingPlan> {
        let duration_secs = self.decoder.duration_secs()?;
        Ok(SamplingPlan::for_duration(duration_secs, self.fps_override))
    }

    /// Streaming mode: invoke the async sink once per decoded frame.
    ///
    /// Exactly one frame is in flight at a time, so memory stays bounded
    /// on long videos. A decode failure at a single timestamp is skipped;
    /// a sink error aborts the run.
    pub async fn stream<F, Fut>(&mut self, mut sink: F) -> PodiumResult<SamplingSummary>
    where
        F: FnMut(SampledFrame) -> Fut,
        Fut: Future<Output = PodiumResult<()>>,
    {
        let plan = self.plan()?;
        tracing::info!(
            duration_secs = plan.duration_secs,
            fps = plan.fps,
            samples = plan.sample_count(),
            "Starting frame sampling"
        );

        let mut delivered = 0usize;
        let mut skipped = 0usize;

        for (index, timestamp_secs) in plan.timestamps() {
            if self.cancel.is_cancelled() {
                tracing::info!(index, "Sampling cancelled");
                return Err(PodiumError::Cancelled);
            }

            match self.decoder.decode_at(index, timestamp_secs) {
                Ok(frame) => {
                    sink(SampledFrame {
                        timestamp_secs,
                        frame,
                    })
                    .await?;
                    delivered += 1;
                }
                Err(e) if e.is_skippable() => {
                    tracing::warn!(index, timestamp_secs, error = %e, "Skipping frame");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let summary = SamplingSummary {
            frames_delivered: delivered,
            frames_skipped: skipped,
            fps: plan.fps,
            interval_secs: plan.interval_secs,
            duration_secs: plan.duration_secs,
        };
        tracing::info!(
            delivered = summary.frames_delivered,
            skipped = summary.frames_skipped,
            "Frame sampling finished"
        );
        Ok(summary)
    }

    /// Batch mode: collect all frames into an ordered sequence.
    ///
    /// Trades memory for simplicity; reserve for short clips.
    pub async fn collect(&mut self) -> PodiumResult<(Vec<SampledFrame>, SamplingSummary)> {
        let mut frames = Vec::new();
        let plan = self.plan()?;
        frames.reserve(plan.sample_count());

        let mut delivered = 0usize;
        let mut skipped = 0usize;
        for (index, timestamp_secs) in plan.timestamps() {
            if self.cancel.is_cancelled() {
                return Err(PodiumError::Cancelled);
            }
            match self.decoder.decode_at(index, timestamp_secs) {
                Ok(frame) => {
                    frames.push(SampledFrame {
                        timestamp_secs,
                        frame,
                    });
                    delivered += 1;
                }
                Err(e) if e.is_skippable() => {
                    tracing::warn!(index, timestamp_secs, error = %e, "Skipping frame");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let summary = SamplingSummary {
            frames_delivered: delivered,
            frames_skipped: skipped,
            fps: plan.fps,
            interval_secs: plan.interval_secs,
            duration_secs: plan.duration_secs,
        };
        Ok((frames, summary))
    }
}
