//! Per-frame metric records produced by the external vision analyzer.
//!
//! Metric streams are recorded in append-only JSONL format, one record per
//! sampled timestamp, index-aligned with the frames the sampler produced.
//! Lines starting with `#` are headers and are skipped on parse.

use serde::{Deserialize, Serialize};

/// Facial metrics for a single sampled frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacialFrame {
    /// Whether a smile was detected.
    pub smiling: bool,

    /// Expressiveness measure [0.0, 1.0].
    pub expressiveness: f64,

    /// Engagement measure [0.0, 1.0].
    pub engagement: f64,

    /// Whether the subject's gaze was directed at the camera.
    #[serde(rename = "looking_at_camera")]
    pub looking_at_camera: bool,
}

/// Posture metrics for a single sampled frame.
///
/// The whole stream may be absent when no body was detected in any frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureFrame {
    /// Body confidence measure [0.0, 1.0].
    pub confidence: f64,
}

/// A decoded raw video frame.
///
/// Ownership is transient: the buffer is held only long enough to be scored
/// or compressed into a key frame, then released.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Zero-based sample index.
    pub index: usize,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Packed RGB8 pixel data, row-major.
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Byte length expected for the declared dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Whether the buffer matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.expected_len()
    }
}

/// Parse facial frames from JSONL content (one JSON object per line).
pub fn parse_facial_frames(jsonl: &str) -> Result<Vec<FacialFrame>, serde_json::Error> {
    parse_jsonl(jsonl)
}

/// Parse posture frames from JSONL content.
pub fn parse_posture_frames(jsonl: &str) -> Result<Vec<PostureFrame>, serde_json::Error> {
    parse_jsonl(jsonl)
}

/// Serialize facial frames to JSONL format.
pub fn serialize_facial_frames(frames: &[FacialFrame]) -> Result<String, serde_json::Error> {
    serialize_jsonl(frames)
}

/// Serialize posture frames to JSONL format.
pub fn serialize_posture_frames(frames: &[PostureFrame]) -> Result<String, serde_json::Error> {
    serialize_jsonl(frames)
}

fn parse_jsonl<T: for<'de> Deserialize<'de>>(jsonl: &str) -> Result<Vec<T>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

fn serialize_jsonl<T: Serialize>(records: &[T]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facial_frame_roundtrip() {
        let frames = vec![
            FacialFrame {
                smiling: true,
                expressiveness: 0.8,
                engagement: 0.7,
                looking_at_camera: true,
            },
            FacialFrame {
                smiling: false,
                expressiveness: 0.2,
                engagement: 0.4,
                looking_at_camera: false,
            },
        ];
        let jsonl = serialize_facial_frames(&frames).unwrap();
        let parsed = parse_facial_frames(&jsonl).unwrap();
        assert_eq!(frames, parsed);
    }

    #[test]
    fn test_posture_frame_roundtrip() {
        let frames = vec![PostureFrame { confidence: 0.65 }];
        let jsonl = serialize_posture_frames(&frames).unwrap();
        let parsed = parse_posture_frames(&jsonl).unwrap();
        assert_eq!(frames, parsed);
    }

    #[test]
    fn test_parse_skips_header_comment() {
        let jsonl = "# {\"schema_version\":\"1.0\"}\n{\"smiling\":true,\"expressiveness\":0.5,\"engagement\":0.5,\"looking_at_camera\":false}\n";
        let parsed = parse_facial_frames(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].smiling);
    }

    #[test]
    fn test_video_frame_well_formed() {
        let frame = VideoFrame {
            index: 0,
            width: 2,
            height: 2,
            data: vec![0u8; 12],
        };
        assert!(frame.is_well_formed());

        let truncated = VideoFrame {
            data: vec![0u8; 11],
            ..frame
        };
        assert!(!truncated.is_well_formed());
    }
}
