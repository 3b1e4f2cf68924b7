//! Modality scores and the session report root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keyframe::KeyFrame;

/// A derived 0-100 score for one analysis modality.
///
/// Always computed, never user-set. Construction clamps into range, so a
/// value outside [0, 100] cannot be represented.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ModalityScore(u8);

impl ModalityScore {
    pub const MIN: ModalityScore = ModalityScore(0);
    pub const MAX: ModalityScore = ModalityScore(100);

    /// Clamp an arbitrary integer into [0, 100].
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Round and clamp a [0.0, 1.0] unit value onto the 0-100 scale.
    ///
    /// Non-finite inputs collapse to 0 rather than panicking; they indicate
    /// a defect upstream, not a valid state.
    pub fn from_unit(unit: f64) -> Self {
        if !unit.is_finite() {
            return Self(0);
        }
        Self::from_percent(unit * 100.0)
    }

    /// Round and clamp a [0.0, 100.0] value.
    pub fn from_percent(percent: f64) -> Self {
        if !percent.is_finite() {
            return Self(0);
        }
        Self(percent.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl std::fmt::Display for ModalityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One analysis channel of a presentation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Facial,
    Posture,
    EyeContact,
    Pacing,
    Tone,
}

/// Which optional visual modalities carry data for a session.
///
/// Eye contact requires a detected face, so `eye_contact` is cleared when
/// `facial` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModalityAvailability {
    pub facial: bool,
    pub posture: bool,
    pub eye_contact: bool,
}

impl ModalityAvailability {
    pub fn new(facial: bool, posture: bool, eye_contact: bool) -> Self {
        Self {
            facial,
            posture,
            eye_contact: eye_contact && facial,
        }
    }

    /// Compact bitmask: bit 0 = facial, bit 1 = posture, bit 2 = eye contact.
    pub fn bitmask(self) -> u8 {
        (self.facial as u8) | ((self.posture as u8) << 1) | ((self.eye_contact as u8) << 2)
    }

    /// Visual modalities with no data.
    pub fn missing(self) -> Vec<Modality> {
        let mut missing = Vec::new();
        if !self.facial {
            missing.push(Modality::Facial);
        }
        if !self.posture {
            missing.push(Modality::Posture);
        }
        if !self.eye_contact {
            missing.push(Modality::EyeContact);
        }
        missing
    }
}

/// Aggregate report for one recorded presentation session.
///
/// Created once after all sub-computations complete, never mutated
/// afterward. Append-only history is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Facial expression score, absent when no face was ever detected.
    pub facial_score: Option<ModalityScore>,

    /// Posture score, absent when no body was ever detected.
    pub posture_score: Option<ModalityScore>,

    /// Eye contact score, absent when facial data is absent.
    pub eye_contact_score: Option<ModalityScore>,

    /// Combined body-language score; falls through the tiered fallback
    /// matrix when modalities are missing.
    pub gesture_score: ModalityScore,

    /// Speech pacing score, absent without a transcript.
    pub pacing_score: Option<ModalityScore>,

    /// Vocal tone score, absent without per-utterance sentiment data.
    pub tone_score: Option<ModalityScore>,

    /// Modalities the consuming layer should render as "insufficient data"
    /// rather than a dishonest zero.
    pub insufficient_data: Vec<Modality>,

    /// Curated annotated key frames (0-6).
    pub key_frames: Vec<KeyFrame>,

    /// Video duration in seconds.
    pub duration_secs: f64,

    /// Interval between sampled frames in seconds (1 / effective FPS).
    pub frame_interval_secs: f64,

    /// Report creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamps_both_ends() {
        assert_eq!(ModalityScore::new(-5).value(), 0);
        assert_eq!(ModalityScore::new(250).value(), 100);
        assert_eq!(ModalityScore::from_percent(100.4).value(), 100);
        assert_eq!(ModalityScore::from_unit(1.7).value(), 100);
        assert_eq!(ModalityScore::from_unit(-0.2).value(), 0);
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        assert_eq!(ModalityScore::from_unit(0.855).value(), 86);
        assert_eq!(ModalityScore::from_percent(72.49).value(), 72);
    }

    #[test]
    fn test_non_finite_collapses_to_zero() {
        assert_eq!(ModalityScore::from_unit(f64::NAN).value(), 0);
        assert_eq!(ModalityScore::from_percent(f64::INFINITY).value(), 0);
    }

    #[test]
    fn test_availability_bitmask() {
        assert_eq!(ModalityAvailability::new(true, true, true).bitmask(), 0b111);
        assert_eq!(
            ModalityAvailability::new(true, false, true).bitmask(),
            0b101
        );
        assert_eq!(
            ModalityAvailability::new(false, true, false).bitmask(),
            0b010
        );
        assert_eq!(ModalityAvailability::default().bitmask(), 0b000);
    }

    #[test]
    fn test_eye_contact_requires_facial() {
        let availability = ModalityAvailability::new(false, true, true);
        assert!(!availability.eye_contact);
        assert_eq!(availability.bitmask(), 0b010);
    }

    #[test]
    fn test_missing_lists_absent_modalities() {
        let availability = ModalityAvailability::new(true, false, true);
        assert_eq!(availability.missing(), vec![Modality::Posture]);
    }
}
