//! Speech metrics: pacing from words-per-minute, tone averaging, and an
//! informational filler-word rate.

use podium_session_model::metrics::ModalityScore;
use podium_session_model::transcript::Transcript;

/// Ideal speaking band in words per minute.
const IDEAL_WPM_LOW: f64 = 130.0;
const IDEAL_WPM_HIGH: f64 = 150.0;

/// Acceptable band: scores fall linearly from 100 at the ideal band edge
/// to 70 at these bounds.
const ACCEPTABLE_WPM_LOW: f64 = 100.0;
const ACCEPTABLE_WPM_HIGH: f64 = 180.0;

/// Common hesitation tokens counted for the filler rate. Matched as whole
/// lowercase words.
const FILLER_WORDS: &[&str] = &["um", "uh", "er", "ah", "like", "literally", "basically"];

/// Aggregated speech metrics for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSummary {
    /// Speaking rate in words per minute.
    pub wpm: f64,

    /// Pacing score derived from `wpm`.
    pub pacing_score: ModalityScore,

    /// Mean of per-utterance tone scores, absent when none were supplied.
    pub tone_score: Option<ModalityScore>,

    /// Filler words per spoken word. Informational only; does not feed
    /// the pacing score.
    pub filler_rate: f64,

    /// Total spoken word count.
    pub word_count: usize,
}

impl SpeechSummary {
    /// Compute speech metrics from a transcript.
    ///
    /// Returns `None` for a transcript with no words or no measurable
    /// speaking time: there is nothing honest to report.
    pub fn from_transcript(transcript: &Transcript) -> Option<Self> {
        let word_count = transcript.word_count();
        let duration = transcript.speaking_duration_secs();
        if word_count == 0 || duration <= 0.0 {
            return None;
        }

        let wpm = word_count as f64 / (duration / 60.0);
        let tones = transcript.tone_scores();
        let tone_score = if tones.is_empty() {
            None
        } else {
            Some(ModalityScore::from_percent(
                tones.iter().sum::<f64>() / tones.len() as f64,
            ))
        };

        Some(Self {
            wpm,
            pacing_score: pacing_score(wpm),
            tone_score,
            filler_rate: filler_rate(transcript, word_count),
            word_count,
        })
    }
}

/// Pacing score from words per minute.
///
/// 100 inside [130, 150], falling linearly to 70 at 100 and 180, then
/// continuing linearly down to 0 beyond the acceptable band. Monotone
/// decreasing in distance from the ideal band.
pub fn pacing_score(wpm: f64) -> ModalityScore {
    if !wpm.is_finite() || wpm <= 0.0 {
        return ModalityScore::MIN;
    }
    let percent = if wpm < ACCEPTABLE_WPM_LOW {
        70.0 * (wpm / ACCEPTABLE_WPM_LOW)
    } else if wpm < IDEAL_WPM_LOW {
        70.0 + 30.0 * (wpm - ACCEPTABLE_WPM_LOW) / (IDEAL_WPM_LOW - ACCEPTABLE_WPM_LOW)
    } else if wpm <= IDEAL_WPM_HIGH {
        100.0
    } else if wpm <= ACCEPTABLE_WPM_HIGH {
        100.0 - 30.0 * (wpm - IDEAL_WPM_HIGH) / (ACCEPTABLE_WPM_HIGH - IDEAL_WPM_HIGH)
    } else {
        (70.0 - 70.0 * (wpm - ACCEPTABLE_WPM_HIGH) / 120.0).max(0.0)
    };
    ModalityScore::from_percent(percent)
}

fn filler_rate(transcript: &Transcript, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let fillers = transcript
        .utterances
        .iter()
        .flat_map(|u| u.text.split_whitespace())
        .filter(|w| {
            let token: String = w
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
                .to_lowercase();
            FILLER_WORDS.contains(&token.as_str())
        })
        .count();
    fillers as f64 / word_count as f64
}
