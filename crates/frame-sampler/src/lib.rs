//! Podium Frame Sampler
//!
//! Decides how densely to sample a video given its duration and yields
//! timestamped frames, streaming or batched:
//! - **Rate:** duration-keyed adaptive FPS table with optional override
//! - **Decoder:** `FrameDecoder` trait with an ffmpeg subprocess backend
//! - **Sampler:** streaming (one frame in flight) and batch access modes,
//!   cooperative cancellation between decodes
//!
//! Per-timestamp decode failures are skipped (best-effort coverage);
//! failing to open or probe the video at all is fatal.

pub mod decoder;
pub mod rate;
pub mod sampler;

pub use decoder::{backend_available, FfmpegDecoder, FrameDecoder};
pub use rate::{sampling_fps, SamplingPlan};
pub use sampler::{CancelToken, FrameSampler, SampledFrame, SamplingSummary};
