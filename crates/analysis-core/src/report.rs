//! Composes scoring, key-frame selection, and speech metrics into the
//! final session report.

use chrono::Utc;
use podium_session_model::frame::{FacialFrame, PostureFrame, VideoFrame};
use podium_session_model::metrics::{Modality, ModalityAvailability, SessionMetrics};

use crate::scoring;
use crate::selector::{KeyFrameSelector, SelectionScores};
use crate::speech::SpeechSummary;

/// Tunables for report generation.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// JPEG quality for key-frame images (1-100).
    pub jpeg_quality: u8,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { jpeg_quality: 60 }
    }
}

/// Everything the report builder consumes. Metric sequences are
/// index-aligned with `frames`; an analyzer that produced nothing for a
/// modality passes an empty slice.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub facial: &'a [FacialFrame],
    pub posture: &'a [PostureFrame],
    pub frames: &'a [VideoFrame],

    /// Video duration in seconds.
    pub duration_secs: f64,

    /// Actual interval between sampled frames (1 / effective FPS).
    pub frame_interval_secs: f64,

    /// Speech metrics, absent without a usable transcript.
    pub speech: Option<SpeechSummary>,
}

/// Build the immutable session report.
///
/// Absent modalities surface as `None` scores plus an entry in
/// `insufficient_data`; they are never reported as zero.
pub fn build_report(inputs: &ReportInputs<'_>, config: &ReportConfig) -> SessionMetrics {
    // The upstream analyzer's expressiveness channel stands in for
    // expression variety.
    let facial_score =
        scoring::facial_score(inputs.facial, scoring::avg_expressiveness(inputs.facial));
    let posture_score = scoring::posture_score(inputs.posture);
    let eye_contact_score = scoring::eye_contact_score(inputs.facial);
    let gesture_score = scoring::gesture_score(facial_score, posture_score, eye_contact_score);

    let availability = ModalityAvailability::new(
        facial_score.is_some(),
        posture_score.is_some(),
        eye_contact_score.is_some(),
    );

    tracing::debug!(
        availability = availability.bitmask(),
        gesture = gesture_score.value(),
        frames = inputs.frames.len(),
        "Scored session"
    );

    let selector =
        KeyFrameSelector::new(inputs.frame_interval_secs).with_jpeg_quality(config.jpeg_quality);
    let key_frames = selector.select(
        inputs.facial,
        inputs.posture,
        inputs.frames,
        &SelectionScores {
            facial: facial_score,
            posture: posture_score,
            eye_contact: eye_contact_score,
        },
    );

    let pacing_score = inputs.speech.map(|s| s.pacing_score);
    let tone_score = inputs.speech.and_then(|s| s.tone_score);

    let mut insufficient_data = availability.missing();
    if pacing_score.is_none() {
        insufficient_data.push(Modality::Pacing);
    }
    if tone_score.is_none() {
        insufficient_data.push(Modality::Tone);
    }

    SessionMetrics {
        facial_score,
        posture_score,
        eye_contact_score,
        gesture_score,
        pacing_score,
        tone_score,
        insufficient_data,
        key_frames,
        duration_secs: inputs.duration_secs,
        frame_interval_secs: inputs.frame_interval_secs,
        created_at: Utc::now(),
    }
}
