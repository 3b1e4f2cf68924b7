//! Per-modality scoring formulas and the gesture fallback matrix.
//!
//! Pure functions over metric sequences; no internal state beyond the
//! computation. Every result is rounded to the nearest integer and
//! clamped to [0, 100].

use podium_session_model::frame::{FacialFrame, PostureFrame};
use podium_session_model::metrics::{ModalityAvailability, ModalityScore};

/// Neutral default when no visual modality carries any data.
pub const NEUTRAL_GESTURE_SCORE: u8 = 50;

/// Fraction of frames with a detected smile.
pub fn smile_frequency(frames: &[FacialFrame]) -> f64 {
    if frames.is_empty() {
        return 0.0;
    }
    frames.iter().filter(|f| f.smiling).count() as f64 / frames.len() as f64
}

/// Mean engagement across frames.
pub fn avg_engagement(frames: &[FacialFrame]) -> f64 {
    mean(frames.iter().map(|f| f.engagement))
}

/// Mean expressiveness across frames.
pub fn avg_expressiveness(frames: &[FacialFrame]) -> f64 {
    mean(frames.iter().map(|f| f.expressiveness))
}

/// Fraction of frames with the gaze on the camera.
pub fn camera_focus_pct(frames: &[FacialFrame]) -> f64 {
    if frames.is_empty() {
        return 0.0;
    }
    frames.iter().filter(|f| f.looking_at_camera).count() as f64 / frames.len() as f64
}

/// Gaze stability: fraction of adjacent frame pairs where the gaze state
/// did not flip. A single frame is trivially stable.
pub fn gaze_stability(frames: &[FacialFrame]) -> f64 {
    if frames.len() < 2 {
        return 1.0;
    }
    let flips = frames
        .windows(2)
        .filter(|w| w[0].looking_at_camera != w[1].looking_at_camera)
        .count();
    1.0 - flips as f64 / (frames.len() - 1) as f64
}

/// Variance of posture confidence across frames.
pub fn posture_variance(frames: &[PostureFrame]) -> f64 {
    variance(frames.iter().map(|f| f.confidence))
}

/// Facial expression score.
///
/// `expression_variety` is caller-supplied: the upstream analyzer's
/// expressiveness channel feeds this slot directly.
pub fn facial_score(frames: &[FacialFrame], expression_variety: f64) -> Option<ModalityScore> {
    if frames.is_empty() {
        return None;
    }
    let weighted = smile_frequency(frames) * 0.30
        + expression_variety * 0.35
        + avg_engagement(frames) * 0.35;
    Some(ModalityScore::from_unit(weighted))
}

/// Posture score from confidence level and movement character.
pub fn posture_score(frames: &[PostureFrame]) -> Option<ModalityScore> {
    if frames.is_empty() {
        return None;
    }
    let avg_confidence = mean(frames.iter().map(|f| f.confidence));
    let variance = posture_variance(frames);
    let weighted = avg_confidence * 0.50
        + movement_consistency(variance) * 0.25
        + stability(variance) * 0.25;
    Some(ModalityScore::from_unit(weighted))
}

/// Eye contact score: mostly camera focus, tempered by gaze stability.
pub fn eye_contact_score(frames: &[FacialFrame]) -> Option<ModalityScore> {
    if frames.is_empty() {
        return None;
    }
    let weighted = camera_focus_pct(frames) * 0.70 + gaze_stability(frames) * 0.30;
    Some(ModalityScore::from_unit(weighted))
}

/// Movement consistency peaks at a variance of ~0.01 — moderate,
/// purposeful movement — and falls off linearly on either side.
pub fn movement_consistency(variance: f64) -> f64 {
    (1.0 - (variance - 0.01).abs() * 50.0).max(0.0)
}

/// Stability penalizes both rigidity and excessive movement.
pub fn stability(variance: f64) -> f64 {
    if variance < 0.001 {
        // Too rigid: standing frozen reads as nervousness.
        0.6
    } else if variance > 0.03 {
        (1.0 - (variance - 0.03) * 20.0).max(0.0)
    } else {
        1.0
    }
}

/// Combined gesture score over whichever visual modalities have data.
///
/// The tiered fallback — rather than treating a missing modality as
/// zero — avoids penalizing sessions where, e.g., the subject's body was
/// out of frame. Keyed on the availability bitmask so each tier is
/// independently testable.
pub fn gesture_score(
    facial: Option<ModalityScore>,
    posture: Option<ModalityScore>,
    eye_contact: Option<ModalityScore>,
) -> ModalityScore {
    let availability =
        ModalityAvailability::new(facial.is_some(), posture.is_some(), eye_contact.is_some());

    // bit 0 = facial, bit 1 = posture, bit 2 = eye contact
    match availability.bitmask() {
        0b111 => {
            let f = facial.unwrap_or_default().as_f64();
            let p = posture.unwrap_or_default().as_f64();
            let e = eye_contact.unwrap_or_default().as_f64();
            ModalityScore::from_percent(f * 0.40 + p * 0.35 + e * 0.25)
        }
        0b101 => {
            let f = facial.unwrap_or_default().as_f64();
            let e = eye_contact.unwrap_or_default().as_f64();
            ModalityScore::from_percent(f * 0.65 + e * 0.35)
        }
        0b011 => {
            let f = facial.unwrap_or_default().as_f64();
            let p = posture.unwrap_or_default().as_f64();
            ModalityScore::from_percent(f * 0.55 + p * 0.45)
        }
        0b001 => facial.unwrap_or_default(),
        0b010 => posture.unwrap_or_default(),
        _ => ModalityScore::new(NEUTRAL_GESTURE_SCORE as i64),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn variance(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    let m = collected.iter().sum::<f64>() / collected.len() as f64;
    collected.iter().map(|v| (v - m).powi(2)).sum::<f64>() / collected.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn facial(smiling: bool, expressiveness: f64, engagement: f64, looking: bool) -> FacialFrame {
        FacialFrame {
            smiling,
            expressiveness,
            engagement,
            looking_at_camera: looking,
        }
    }

    fn posture_frames(confidences: &[f64]) -> Vec<PostureFrame> {
        confidences
            .iter()
            .map(|c| PostureFrame { confidence: *c })
            .collect()
    }

    #[test]
    fn test_facial_score_uniform_scenario() {
        // 45s video at 2 FPS: 91 uniform frames
        let frames = vec![facial(true, 0.8, 0.8, true); 91];
        let variety = avg_expressiveness(&frames);
        let score = facial_score(&frames, variety).unwrap();
        assert_eq!(score.value(), 86);
    }

    #[test]
    fn test_facial_score_empty_is_absent() {
        assert!(facial_score(&[], 0.5).is_none());
    }

    #[test]
    fn test_eye_contact_uniform_focus() {
        let frames = vec![facial(false, 0.1, 0.1, true); 10];
        assert_eq!(eye_contact_score(&frames).unwrap().value(), 100);
    }

    #[test]
    fn test_gaze_stability_counts_flips() {
        let frames = vec![
            facial(false, 0.0, 0.0, true),
            facial(false, 0.0, 0.0, false),
            facial(false, 0.0, 0.0, true),
            facial(false, 0.0, 0.0, true),
        ];
        // 2 flips over 3 adjacent pairs
        assert!((gaze_stability(&frames) - (1.0 - 2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_stability_curve() {
        assert_eq!(stability(0.0005), 0.6);
        assert_eq!(stability(0.01), 1.0);
        assert!((stability(0.05) - 0.6).abs() < 1e-9);
        assert_eq!(stability(0.2), 0.0);
    }

    #[test]
    fn test_movement_consistency_curve() {
        assert_eq!(movement_consistency(0.01), 1.0);
        assert_eq!(movement_consistency(0.0), 0.5);
        assert_eq!(movement_consistency(1.0), 0.0);
    }

    #[test]
    fn test_gesture_all_three() {
        let score = gesture_score(
            Some(ModalityScore::new(80)),
            Some(ModalityScore::new(60)),
            Some(ModalityScore::new(70)),
        );
        // 80*0.40 + 60*0.35 + 70*0.25 = 70.5 -> 71
        assert_eq!(score.value(), 71);
    }

    #[test]
    fn test_gesture_facial_and_eye_contact() {
        let score = gesture_score(
            Some(ModalityScore::new(80)),
            None,
            Some(ModalityScore::new(60)),
        );
        assert_eq!(score.value(), 73);
    }

    #[test]
    fn test_gesture_facial_and_posture() {
        let score = gesture_score(
            Some(ModalityScore::new(70)),
            Some(ModalityScore::new(70)),
            None,
        );
        assert_eq!(score.value(), 70);
    }

    #[test]
    fn test_gesture_single_modality_passthrough() {
        assert_eq!(
            gesture_score(Some(ModalityScore::new(42)), None, None).value(),
            42
        );
        assert_eq!(
            gesture_score(None, Some(ModalityScore::new(55)), None).value(),
            55
        );
    }

    #[test]
    fn test_gesture_neutral_default() {
        assert_eq!(gesture_score(None, None, None).value(), 50);
    }

    #[test]
    fn test_gesture_eye_contact_without_facial_is_dropped() {
        // Eye contact requires a detected face; the availability mask
        // clears it, leaving the neutral default.
        let score = gesture_score(None, None, Some(ModalityScore::new(90)));
        assert_eq!(score.value(), 50);
    }

    #[test]
    fn test_posture_score_adversarial_variance() {
        // Zero variance: avg 0.5 -> 0.5*0.5 + 0.5*0.25 + 0.6*0.25 = 0.525
        let frozen = posture_frames(&[0.5; 20]);
        assert_eq!(posture_score(&frozen).unwrap().value(), 53);

        // Extreme swing keeps the score in range
        let wild = posture_frames(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let score = posture_score(&wild).unwrap();
        assert!(score.value() <= 100);
    }

    proptest! {
        #[test]
        fn prop_facial_score_in_range(
            smiles in proptest::collection::vec(any::<bool>(), 1..200),
            variety in 0.0f64..1.0,
        ) {
            let frames: Vec<FacialFrame> = smiles
                .iter()
                .enumerate()
                .map(|(i, s)| facial(*s, (i % 10) as f64 / 10.0, (i % 7) as f64 / 7.0, i % 2 == 0))
                .collect();
            let score = facial_score(&frames, variety).unwrap();
            prop_assert!(score.value() <= 100);
        }

        #[test]
        fn prop_posture_score_in_range(
            confidences in proptest::collection::vec(0.0f64..=1.0, 1..200),
        ) {
            let frames = posture_frames(&confidences);
            let score = posture_score(&frames).unwrap();
            prop_assert!(score.value() <= 100);
        }

        #[test]
        fn prop_stability_in_unit_range(variance in 0.0f64..=1.0) {
            let s = stability(variance);
            prop_assert!((0.0..=1.0).contains(&s));
            let m = movement_consistency(variance);
            prop_assert!((0.0..=1.0).contains(&m));
        }
    }
}
