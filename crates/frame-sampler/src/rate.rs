//! Adaptive sampling-rate selection.
//!
//! Short clips are sampled densely; long recordings back off so total
//! decode work grows sublinearly with duration.

/// Effective sampling rate for a video of the given duration.
///
/// | Duration D (s)  | FPS |
/// |-----------------|-----|
/// | D < 20          | 3.0 |
/// | 20 <= D < 60    | 2.0 |
/// | 60 <= D < 120   | 1.5 |
/// | D >= 120        | 1.0 |
pub fn sampling_fps(duration_secs: f64) -> f64 {
    if duration_secs < 20.0 {
        3.0
    } else if duration_secs < 60.0 {
        2.0
    } else if duration_secs < 120.0 {
        1.5
    } else {
        1.0
    }
}

/// A resolved sampling plan for one video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    /// Video duration in seconds.
    pub duration_secs: f64,

    /// Effective sampling rate.
    pub fps: f64,

    /// Interval between samples (1 / fps).
    pub interval_secs: f64,
}

impl SamplingPlan {
    /// Build a plan for the given duration, honoring an explicit rate
    /// override when present.
    pub fn for_duration(duration_secs: f64, fps_override: Option<f64>) -> Self {
        let fps = fps_override
            .filter(|fps| *fps > 0.0)
            .unwrap_or_else(|| sampling_fps(duration_secs));
        Self {
            duration_secs: duration_secs.max(0.0),
            fps,
            interval_secs: 1.0 / fps,
        }
    }

    /// Number of sample timestamps: t = 0, i, 2i, ... up to the duration
    /// inclusive.
    pub fn sample_count(&self) -> usize {
        if self.duration_secs <= 0.0 {
            return 1;
        }
        // Epsilon absorbs float error when the duration is an exact
        // multiple of the interval.
        (self.duration_secs * self.fps + 1e-9).floor() as usize + 1
    }

    /// Timestamp of the given sample index.
    pub fn timestamp(&self, index: usize) -> f64 {
        index as f64 * self.interval_secs
    }

    /// All sample timestamps in order.
    pub fn timestamps(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.sample_count()).map(|index| (index, self.timestamp(index)))
    }
}
