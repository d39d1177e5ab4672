//! Video stream metadata via `ffprobe`.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

use reelcut_common::error::{ReelcutError, ReelcutResult};

/// Properties of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoInfo {
    pub frame_count: u64,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
}

impl VideoInfo {
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.frame_rate
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    nb_frames: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

/// Probe `path` with ffprobe.
pub fn probe_video(path: &Path) -> ReelcutResult<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,nb_frames,r_frame_rate,avg_frame_rate,duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| ReelcutError::probe(format!("Failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(ReelcutError::probe(format!(
            "ffprobe failed on {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let info = parse_probe_output(&raw)?;
    tracing::debug!(
        path = %path.display(),
        frames = info.frame_count,
        fps = info.frame_rate,
        width = info.width,
        height = info.height,
        "Probed video"
    );
    Ok(info)
}

/// Parse ffprobe's JSON output for the first video stream.
pub fn parse_probe_output(json: &str) -> ReelcutResult<VideoInfo> {
    let parsed: ProbeOutput = serde_json::from_str(json)?;
    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ReelcutError::probe("No video stream found"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(ReelcutError::probe("Video stream has no dimensions")),
    };

    let frame_rate = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate))
        .ok_or_else(|| ReelcutError::probe("Video stream has no usable frame rate"))?;

    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .or_else(|| {
            let duration = stream.duration.as_deref()?.parse::<f64>().ok()?;
            (duration > 0.0).then(|| (duration * frame_rate).round() as u64)
        })
        .ok_or_else(|| ReelcutError::probe("Cannot determine frame count"))?;

    Ok(VideoInfo {
        frame_count,
        frame_rate,
        width,
        height,
    })
}

/// Parse an ffprobe rational such as `60000/1001`. Zero rates are rejected.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.trim().parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
