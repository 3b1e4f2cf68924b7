//! Annotated key-frame records.

use serde::{Deserialize, Serialize};

use crate::metrics::ModalityScore;

/// Why a key frame was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFrameKind {
    /// Strongest facial moment (smile, expressiveness, engagement).
    BestFacial,
    /// Strongest combined facial + posture moment.
    BestOverall,
    /// Weakest facial moment, shown as an improvement area.
    ImproveFacial,
    /// Weakest posture moment.
    ImprovePosture,
    /// A moment where the gaze left the camera.
    ImproveEyeContact,
    /// Temporal-midpoint fallback when too few frames qualified.
    AverageMoment,
}

impl KeyFrameKind {
    /// Whether frames of this kind illustrate a strength.
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            KeyFrameKind::BestFacial | KeyFrameKind::BestOverall | KeyFrameKind::AverageMoment
        )
    }

    /// Short label for the metric this frame illustrates.
    pub fn primary_metric(self) -> &'static str {
        match self {
            KeyFrameKind::BestFacial => "facial_expression",
            KeyFrameKind::BestOverall => "overall_presence",
            KeyFrameKind::ImproveFacial => "facial_expression",
            KeyFrameKind::ImprovePosture => "posture",
            KeyFrameKind::ImproveEyeContact => "eye_contact",
            KeyFrameKind::AverageMoment => "overall_presence",
        }
    }
}

/// A single selected, scored, and annotated video frame used as visual
/// evidence in feedback. Created once per report, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFrame {
    /// JPEG-compressed image bytes.
    pub image: Vec<u8>,

    /// Position in the video, seconds. Derived from the sample index and
    /// the actual frame interval.
    pub timestamp_secs: f64,

    /// Selection category.
    pub kind: KeyFrameKind,

    /// Human-readable label of the metric illustrated.
    pub primary_metric: String,

    /// Score for this moment on the 0-100 scale.
    pub score: ModalityScore,

    /// Human-readable feedback text.
    pub annotation: String,

    /// Whether this frame illustrates a strength.
    pub is_positive: bool,

    /// Sample index the frame was taken from. Unique within one selection
    /// run except for the documented average-moment fallback.
    pub source_index: usize,
}
