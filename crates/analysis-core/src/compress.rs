//! JPEG compression for key-frame images.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, RgbImage};
use podium_common::error::{PodiumError, PodiumResult};
use podium_session_model::frame::VideoFrame;

/// Longest edge of a compressed key frame. Full-resolution frames blow
/// past the 30-50KB target even at moderate quality.
const MAX_EDGE_PX: u32 = 640;

/// Compress a decoded frame to JPEG at the given quality (1-100).
///
/// Frames larger than `MAX_EDGE_PX` on their longest edge are downscaled
/// first, preserving aspect ratio.
pub fn compress_jpeg(frame: &VideoFrame, quality: u8) -> PodiumResult<Vec<u8>> {
    if !frame.is_well_formed() {
        return Err(PodiumError::compression(format!(
            "Frame {} buffer length {} does not match {}x{} rgb24",
            frame.index,
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let quality = quality.clamp(1, 100);
    let longest = frame.width.max(frame.height);

    let mut out = Vec::new();
    if longest > MAX_EDGE_PX {
        let image = RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| PodiumError::compression("Failed to wrap frame buffer"))?;
        let scale = MAX_EDGE_PX as f64 / longest as f64;
        let width = ((frame.width as f64 * scale).round() as u32).max(1);
        let height = ((frame.height as f64 * scale).round() as u32).max(1);
        let resized = image::imageops::resize(&image, width, height, FilterType::Triangle);

        JpegEncoder::new_with_quality(&mut out, quality)
            .encode(resized.as_raw(), width, height, ColorType::Rgb8)
            .map_err(|e| PodiumError::compression(e.to_string()))?;
    } else {
        JpegEncoder::new_with_quality(&mut out, quality)
            .encode(&frame.data, frame.width, frame.height, ColorType::Rgb8)
            .map_err(|e| PodiumError::compression(e.to_string()))?;
    }

    Ok(out)
}
