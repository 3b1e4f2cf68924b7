//! Key-frame selection: picks 0-6 representative frames from a session.
//!
//! Selection is an ordered sequence of rules, each excluding indices
//! already used, executed in a fixed order because later rules assume
//! earlier picks are reserved:
//!
//! 1. Best facial moment (always attempted when facial data exists)
//! 2. Best overall moment (facial + posture)
//! 3. Improve-facial (only when the facial score is below 85)
//! 4. Improve-posture (only when the posture score is below 85)
//! 5. Improve-eye-contact (below 70, and fewer than 4 frames so far)
//! 6. Average-moment fallback (fewer than 2 frames so far; the only rule
//!    allowed to reuse an index)
//!
//! Ties resolve to the first-encountered index in scan order, so the
//! selector is deterministic for identical inputs.

use std::collections::HashSet;

use podium_session_model::frame::{FacialFrame, PostureFrame, VideoFrame};
use podium_session_model::keyframe::{KeyFrame, KeyFrameKind};
use podium_session_model::metrics::ModalityScore;

use crate::annotate::{annotation_for, AnnotationContext};
use crate::compress::compress_jpeg;
use crate::scoring::NEUTRAL_GESTURE_SCORE;

/// Modality scores feeding the rule conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionScores {
    pub facial: Option<ModalityScore>,
    pub posture: Option<ModalityScore>,
    pub eye_contact: Option<ModalityScore>,
}

/// The key-frame selector.
pub struct KeyFrameSelector {
    frame_interval_secs: f64,
    jpeg_quality: u8,
}

impl KeyFrameSelector {
    /// Create a selector. `frame_interval_secs` is the actual sampling
    /// interval (1 / effective FPS), used to derive timestamps from
    /// sample indices.
    pub fn new(frame_interval_secs: f64) -> Self {
        Self {
            frame_interval_secs,
            jpeg_quality: 60,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Run selection. Sequences are index-aligned with `frames`.
    ///
    /// A compression failure drops that key frame rather than aborting:
    /// partial results are preferred over none.
    pub fn select(
        &self,
        facial: &[FacialFrame],
        posture: &[PostureFrame],
        frames: &[VideoFrame],
        scores: &SelectionScores,
    ) -> Vec<KeyFrame> {
        let mut used: HashSet<usize> = HashSet::new();
        let mut selected: Vec<KeyFrame> = Vec::new();

        let facial_domain = facial.len().min(frames.len());
        let overall_domain = facial_domain.min(posture.len());
        let posture_domain = posture.len().min(frames.len());

        // Rule 1: best facial moment.
        if let Some(idx) = argmax(facial_domain, &used, |i| facial_heuristic(&facial[i])) {
            used.insert(idx);
            self.emit(
                &mut selected,
                KeyFrameKind::BestFacial,
                idx,
                frames,
                facial,
                posture,
                scores,
            );
        }

        // Rule 2: best overall moment, facial and posture combined.
        if !facial.is_empty() && !posture.is_empty() {
            let candidate = argmax(overall_domain, &used, |i| {
                overall_heuristic(&facial[i], &posture[i])
            });
            if let Some(idx) = candidate {
                if overall_heuristic(&facial[idx], &posture[idx]) > 0.0 {
                    used.insert(idx);
                    self.emit(
                        &mut selected,
                        KeyFrameKind::BestOverall,
                        idx,
                        frames,
                        facial,
                        posture,
                        scores,
                    );
                }
            }
        }

        // Rule 3: improvement area — weakest facial moment.
        if scores.facial.map(|s| s.value() < 85).unwrap_or(false) {
            if let Some(idx) = argmin(facial_domain, &used, |i| facial_heuristic(&facial[i])) {
                used.insert(idx);
                self.emit(
                    &mut selected,
                    KeyFrameKind::ImproveFacial,
                    idx,
                    frames,
                    facial,
                    posture,
                    scores,
                );
            }
        }

        // Rule 4: improvement area — weakest posture moment.
        if scores.posture.map(|s| s.value() < 85).unwrap_or(false) {
            if let Some(idx) = argmin(posture_domain, &used, |i| posture[i].confidence) {
                used.insert(idx);
                self.emit(
                    &mut selected,
                    KeyFrameKind::ImprovePosture,
                    idx,
                    frames,
                    facial,
                    posture,
                    scores,
                );
            }
        }

        // Rule 5: improvement area — gaze off camera.
        let eye_needs_work = scores.eye_contact.map(|s| s.value() < 70).unwrap_or(false);
        if selected.len() < 4 && eye_needs_work {
            // Prefer a frame where the gaze left the camera: argmin over
            // looking_at_camera as {0, 1}.
            if let Some(idx) = argmin(facial_domain, &used, |i| {
                facial[i].looking_at_camera as u8 as f64
            }) {
                used.insert(idx);
                self.emit(
                    &mut selected,
                    KeyFrameKind::ImproveEyeContact,
                    idx,
                    frames,
                    facial,
                    posture,
                    scores,
                );
            }
        }

        // Rule 6: average-moment fallback. The temporal midpoint is used
        // regardless of reuse exclusion — the sole case where an
        // already-used index may legitimately recur.
        if selected.len() < 2 && !frames.is_empty() {
            let idx = frames.len() / 2;
            self.emit(
                &mut selected,
                KeyFrameKind::AverageMoment,
                idx,
                frames,
                facial,
                posture,
                scores,
            );
        }

        selected
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        selected: &mut Vec<KeyFrame>,
        kind: KeyFrameKind,
        index: usize,
        frames: &[VideoFrame],
        facial: &[FacialFrame],
        posture: &[PostureFrame],
        scores: &SelectionScores,
    ) {
        let Some(frame) = frames.get(index) else {
            return;
        };

        let image = match compress_jpeg(frame, self.jpeg_quality) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(index, kind = ?kind, error = %e, "Dropping key frame");
                return;
            }
        };

        let ctx = AnnotationContext {
            facial: facial.get(index).copied(),
            posture: posture.get(index).copied(),
        };

        selected.push(KeyFrame {
            image,
            timestamp_secs: index as f64 * self.frame_interval_secs,
            kind,
            primary_metric: kind.primary_metric().to_string(),
            score: self.moment_score(kind, index, facial, posture, scores),
            annotation: annotation_for(kind, &ctx),
            is_positive: kind.is_positive(),
            source_index: index,
        });
    }

    fn moment_score(
        &self,
        kind: KeyFrameKind,
        index: usize,
        facial: &[FacialFrame],
        posture: &[PostureFrame],
        scores: &SelectionScores,
    ) -> ModalityScore {
        match kind {
            KeyFrameKind::BestFacial | KeyFrameKind::ImproveFacial => facial
                .get(index)
                .map(|f| ModalityScore::from_unit(facial_heuristic(f)))
                .unwrap_or_default(),
            KeyFrameKind::BestOverall | KeyFrameKind::AverageMoment => {
                mean_available_score(scores)
            }
            KeyFrameKind::ImprovePosture => posture
                .get(index)
                .map(|p| ModalityScore::from_unit(p.confidence))
                .unwrap_or_default(),
            KeyFrameKind::ImproveEyeContact => scores.eye_contact.unwrap_or_default(),
        }
    }
}

/// Weighted facial moment heuristic used by rules 1 and 3.
fn facial_heuristic(f: &FacialFrame) -> f64 {
    (if f.smiling { 0.4 } else { 0.0 }) + f.expressiveness * 0.3 + f.engagement * 0.3
}

/// Combined facial + posture heuristic used by rule 2.
fn overall_heuristic(f: &FacialFrame, p: &PostureFrame) -> f64 {
    (if f.smiling { 0.3 } else { 0.0 })
        + f.expressiveness * 0.2
        + f.engagement * 0.2
        + (if f.looking_at_camera { 0.1 } else { 0.0 })
        + p.confidence * 0.2
}

/// Mean of whichever modality scores are available; neutral when none.
fn mean_available_score(scores: &SelectionScores) -> ModalityScore {
    let available: Vec<f64> = [scores.facial, scores.posture, scores.eye_contact]
        .iter()
        .filter_map(|s| s.map(ModalityScore::as_f64))
        .collect();
    if available.is_empty() {
        return ModalityScore::new(NEUTRAL_GESTURE_SCORE as i64);
    }
    ModalityScore::from_percent(available.iter().sum::<f64>() / available.len() as f64)
}

/// First-encountered argmax over unused indices. Strict comparison keeps
/// ties on the earliest index.
fn argmax(domain: usize, used: &HashSet<usize>, score: impl Fn(usize) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in (0..domain).filter(|i| !used.contains(i)) {
        let s = score(i);
        if best.map(|(_, bs)| s > bs).unwrap_or(true) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

/// First-encountered argmin over unused indices.
fn argmin(domain: usize, used: &HashSet<usize>, score: impl Fn(usize) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in (0..domain).filter(|i| !used.contains(i)) {
        let s = score(i);
        if best.map(|(_, bs)| s < bs).unwrap_or(true) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facial(smiling: bool, expressiveness: f64, engagement: f64, looking: bool) -> FacialFrame {
        FacialFrame {
            smiling,
            expressiveness,
            engagement,
            looking_at_camera: looking,
        }
    }

    fn solid_frames(count: usize) -> Vec<VideoFrame> {
        (0..count)
            .map(|index| VideoFrame {
                index,
                width: 8,
                height: 8,
                data: vec![128u8; 8 * 8 * 3],
            })
            .collect()
    }

    fn scores(facial: Option<i64>, posture: Option<i64>, eye: Option<i64>) -> SelectionScores {
        SelectionScores {
            facial: facial.map(ModalityScore::new),
            posture: posture.map(ModalityScore::new),
            eye_contact: eye.map(ModalityScore::new),
        }
    }

    #[test]
    fn test_best_facial_picks_strongest_moment() {
        let facial_frames = vec![
            facial(false, 0.1, 0.1, true),
            facial(true, 0.9, 0.9, true),
            facial(false, 0.5, 0.5, true),
        ];
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &[],
            &solid_frames(3),
            &scores(Some(90), None, None),
        );

        assert_eq!(selected[0].kind, KeyFrameKind::BestFacial);
        assert_eq!(selected[0].source_index, 1);
        assert!((selected[0].timestamp_secs - 0.5).abs() < 1e-9);
        assert!(selected[0].is_positive);
    }

    #[test]
    fn test_ties_resolve_to_first_index() {
        let facial_frames = vec![facial(true, 0.8, 0.8, true); 5];
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &[],
            &solid_frames(5),
            &scores(Some(90), None, None),
        );
        assert_eq!(selected[0].source_index, 0);
    }

    #[test]
    fn test_no_index_reuse_outside_fallback() {
        let facial_frames: Vec<FacialFrame> = (0..12)
            .map(|i| facial(i % 2 == 0, i as f64 / 12.0, 0.5, i % 3 == 0))
            .collect();
        let posture_frames: Vec<PostureFrame> = (0..12)
            .map(|i| PostureFrame {
                confidence: i as f64 / 12.0,
            })
            .collect();
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &posture_frames,
            &solid_frames(12),
            &scores(Some(60), Some(55), Some(40)),
        );

        assert!(selected.len() >= 5);
        let non_fallback: Vec<usize> = selected
            .iter()
            .filter(|k| k.kind != KeyFrameKind::AverageMoment)
            .map(|k| k.source_index)
            .collect();
        let mut deduped = non_fallback.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(non_fallback.len(), deduped.len());
    }

    #[test]
    fn test_fallback_may_reuse_index() {
        // Single-frame session: rule 1 takes index 0, rule 6 reuses it.
        let facial_frames = vec![facial(false, 0.2, 0.2, true)];
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &[],
            &solid_frames(1),
            &scores(Some(30), None, None),
        );

        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].kind, KeyFrameKind::BestFacial);
        assert_eq!(selected[1].kind, KeyFrameKind::ImproveFacial);
        assert_eq!(selected[2].kind, KeyFrameKind::AverageMoment);
        assert_eq!(selected[2].source_index, 0);
    }

    #[test]
    fn test_empty_frames_selects_nothing() {
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(&[], &[], &[], &SelectionScores::default());
        assert!(selected.is_empty());
    }

    #[test]
    fn test_frames_without_metrics_yield_average_moment() {
        let selector = KeyFrameSelector::new(1.0);
        let selected = selector.select(&[], &[], &solid_frames(9), &SelectionScores::default());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].kind, KeyFrameKind::AverageMoment);
        assert_eq!(selected[0].source_index, 4);
        assert!((selected[0].timestamp_secs - 4.0).abs() < 1e-9);
        assert_eq!(selected[0].score.value(), 50);
    }

    #[test]
    fn test_high_scores_suppress_improvement_rules() {
        let facial_frames = vec![facial(true, 0.9, 0.9, true); 10];
        let posture_frames = vec![PostureFrame { confidence: 0.9 }; 10];
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &posture_frames,
            &solid_frames(10),
            &scores(Some(90), Some(92), Some(95)),
        );

        assert!(selected
            .iter()
            .all(|k| k.kind != KeyFrameKind::ImproveFacial
                && k.kind != KeyFrameKind::ImprovePosture
                && k.kind != KeyFrameKind::ImproveEyeContact));
    }

    #[test]
    fn test_eye_contact_rule_prefers_off_camera_frame() {
        let facial_frames = vec![
            facial(true, 0.5, 0.5, true),
            facial(true, 0.6, 0.6, true),
            facial(false, 0.1, 0.1, false),
            facial(true, 0.4, 0.4, true),
        ];
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &[],
            &solid_frames(4),
            &scores(Some(90), None, Some(50)),
        );

        let eye = selected
            .iter()
            .find(|k| k.kind == KeyFrameKind::ImproveEyeContact)
            .expect("eye contact rule should fire");
        assert_eq!(eye.source_index, 2);
        assert!(!eye.is_positive);
        assert_eq!(eye.score.value(), 50);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let facial_frames: Vec<FacialFrame> = (0..20)
            .map(|i| facial(i % 3 == 0, (i % 5) as f64 / 5.0, (i % 4) as f64 / 4.0, i % 2 == 0))
            .collect();
        let posture_frames: Vec<PostureFrame> = (0..20)
            .map(|i| PostureFrame {
                confidence: ((i * 7) % 10) as f64 / 10.0,
            })
            .collect();
        let frames = solid_frames(20);
        let s = scores(Some(55), Some(60), Some(45));
        let selector = KeyFrameSelector::new(0.5);

        let a = selector.select(&facial_frames, &posture_frames, &frames, &s);
        let b = selector.select(&facial_frames, &posture_frames, &frames, &s);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.source_index, y.source_index);
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.annotation, y.annotation);
        }
    }

    #[test]
    fn test_count_never_exceeds_six() {
        let facial_frames: Vec<FacialFrame> = (0..50)
            .map(|i| facial(i % 2 == 0, (i % 7) as f64 / 7.0, (i % 5) as f64 / 5.0, i % 4 == 0))
            .collect();
        let posture_frames: Vec<PostureFrame> = (0..50)
            .map(|i| PostureFrame {
                confidence: (i % 9) as f64 / 9.0,
            })
            .collect();
        let selector = KeyFrameSelector::new(0.5);
        let selected = selector.select(
            &facial_frames,
            &posture_frames,
            &solid_frames(50),
            &scores(Some(40), Some(40), Some(40)),
        );
        assert!(selected.len() <= 6);
    }
}
