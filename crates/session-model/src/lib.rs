//! Podium Session Model
//!
//! Pure data types shared across the analysis pipeline:
//! - Per-frame vision metrics (`FacialFrame`, `PostureFrame`) and raw
//!   `VideoFrame` buffers
//! - Annotated `KeyFrame` output records
//! - The immutable `SessionMetrics` report root
//! - Transcript types for the speech path
//!
//! No I/O beyond JSONL parse/serialize helpers; no computation.

pub mod frame;
pub mod keyframe;
pub mod metrics;
pub mod transcript;

pub use frame::*;
pub use keyframe::*;
pub use metrics::*;
pub use transcript::*;
