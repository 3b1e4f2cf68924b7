//! Podium Analysis Core
//!
//! Converts per-frame vision metrics and transcripts into the feedback
//! report:
//! - **Scoring:** per-modality 0-100 scores with a tiered fallback matrix
//!   for missing modalities
//! - **Key-Frame Selection:** 0-6 representative frames, tagged, scored,
//!   and annotated
//! - **Speech Metrics:** pacing from words-per-minute, tone averaging
//! - **Report:** `build_report` composes everything into an immutable
//!   `SessionMetrics`
//!
//! This crate is pure computation — no I/O beyond JPEG encoding of
//! already-decoded buffers. All inputs are data; all outputs are data.

pub mod annotate;
pub mod compress;
pub mod report;
pub mod scoring;
pub mod selector;
pub mod speech;

pub use report::{build_report, ReportConfig, ReportInputs};
pub use selector::{KeyFrameSelector, SelectionScores};
pub use speech::SpeechSummary;
