//! Transcript types for the speech analysis path.
//!
//! Produced externally by a speech-to-text and sentiment service; the core
//! consumes the transcript as data and performs no NLP itself.

use serde::{Deserialize, Serialize};

/// A single transcribed utterance with timing and optional sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Start time in seconds.
    pub start_secs: f64,

    /// End time in seconds.
    pub end_secs: f64,

    /// Transcribed text.
    pub text: String,

    /// Externally supplied tone/sentiment score [0.0, 100.0], if the
    /// sentiment service produced one for this utterance.
    pub tone: Option<f64>,
}

impl Utterance {
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A full session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transcript {
    /// Detected language (ISO 639-1), if known.
    pub language: Option<String>,

    /// Ordered utterances.
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    /// Total spoken word count.
    pub fn word_count(&self) -> usize {
        self.utterances.iter().map(Utterance::word_count).sum()
    }

    /// Time from the first utterance start to the last utterance end.
    ///
    /// Zero when the transcript is empty.
    pub fn speaking_duration_secs(&self) -> f64 {
        let start = self.utterances.first().map(|u| u.start_secs);
        let end = self.utterances.last().map(|u| u.end_secs);
        match (start, end) {
            (Some(s), Some(e)) => (e - s).max(0.0),
            _ => 0.0,
        }
    }

    /// Per-utterance tone scores, skipping utterances without one.
    pub fn tone_scores(&self) -> Vec<f64> {
        self.utterances.iter().filter_map(|u| u.tone).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(start: f64, end: f64, text: &str, tone: Option<f64>) -> Utterance {
        Utterance {
            start_secs: start,
            end_secs: end,
            text: text.to_string(),
            tone,
        }
    }

    #[test]
    fn test_word_count() {
        let transcript = Transcript {
            language: Some("en".to_string()),
            utterances: vec![
                utterance(0.0, 2.0, "hello everyone and welcome", Some(80.0)),
                utterance(2.5, 4.0, "to my talk", None),
            ],
        };
        assert_eq!(transcript.word_count(), 7);
    }

    #[test]
    fn test_speaking_duration_spans_utterances() {
        let transcript = Transcript {
            language: None,
            utterances: vec![
                utterance(1.0, 2.0, "a", None),
                utterance(5.0, 9.5, "b", None),
            ],
        };
        assert!((transcript.speaking_duration_secs() - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_transcript_duration_is_zero() {
        assert_eq!(Transcript::default().speaking_duration_secs(), 0.0);
        assert_eq!(Transcript::default().word_count(), 0);
    }

    #[test]
    fn test_tone_scores_skip_missing() {
        let transcript = Transcript {
            language: None,
            utterances: vec![
                utterance(0.0, 1.0, "a", Some(70.0)),
                utterance(1.0, 2.0, "b", None),
                utterance(2.0, 3.0, "c", Some(90.0)),
            ],
        };
        assert_eq!(transcript.tone_scores(), vec![70.0, 90.0]);
    }

    #[test]
    fn test_transcript_roundtrip() {
        let transcript = Transcript {
            language: Some("en".to_string()),
            utterances: vec![utterance(0.0, 1.5, "testing one two", Some(55.0))],
        };
        let json = serde_json::to_string(&transcript).unwrap();
        let parsed: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(transcript, parsed);
    }
}
