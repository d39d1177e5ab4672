//! Frame source that seeks and decodes single frames with ffmpeg.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbImage;

use reelcut_common::error::{ReelcutError, ReelcutResult};
use reelcut_processing_core::pipeline::FrameSource;

use crate::frame::VideoFrame;
use crate::probe::{probe_video, VideoInfo};

/// An open video. Every `read_frame` runs one ffmpeg decode that is
/// reaped before returning; dropping the source logs its release.
#[derive(Debug)]
pub struct FfmpegFrameSource {
    path: PathBuf,
    info: VideoInfo,
    frames_decoded: u64,
}

impl FfmpegFrameSource {
    /// Probe `path` and open it for frame reads.
    pub fn open(path: &Path) -> ReelcutResult<Self> {
        if !path.exists() {
            return Err(ReelcutError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let info = probe_video(path)?;
        tracing::info!(
            path = %path.display(),
            frames = info.frame_count,
            fps = info.frame_rate,
            "Opened video"
        );
        Ok(Self {
            path: path.to_path_buf(),
            info,
            frames_decoded: 0,
        })
    }
}

/// Seek position selecting frame `index`: half a frame before its timestamp,
/// so float rounding can never land on the following frame.
pub fn seek_secs(index: u64, frame_rate: f64) -> f64 {
    ((index as f64 - 0.5) / frame_rate).max(0.0)
}

/// Arguments decoding one RGB24 frame starting at `seek` to stdout.
pub fn decode_args(path: &Path, seek: f64) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{seek:.6}"),
        "-i".to_string(),
        path.to_string_lossy().into_owned(),
        "-frames:v".to_string(),
        "1".to_string(),
        "-an".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "pipe:1".to_string(),
    ]
}

impl FrameSource for FfmpegFrameSource {
    type Frame = VideoFrame;

    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn frame_rate(&self) -> f64 {
        self.info.frame_rate
    }

    fn read_frame(&mut self, index: u64) -> ReelcutResult<VideoFrame> {
        if index >= self.info.frame_count {
            return Err(ReelcutError::unreadable_frame(
                index,
                format!("past end of stream ({} frames)", self.info.frame_count),
            ));
        }

        let args = decode_args(&self.path, seek_secs(index, self.info.frame_rate));
        tracing::trace!(frame = index, ?args, "Decoding frame");

        let output = Command::new("ffmpeg")
            .args(&args)
            .output()
            .map_err(|e| {
                ReelcutError::unreadable_frame(index, format!("Failed to start ffmpeg: {e}"))
            })?;

        if !output.status.success() {
            return Err(ReelcutError::unreadable_frame(
                index,
                format!(
                    "ffmpeg exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let VideoInfo { width, height, .. } = self.info;
        let expected = width as usize * height as usize * 3;
        if output.stdout.len() < expected {
            return Err(ReelcutError::unreadable_frame(
                index,
                format!("expected {expected} bytes, got {}", output.stdout.len()),
            ));
        }

        let mut data = output.stdout;
        data.truncate(expected);
        let rgb = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| ReelcutError::unreadable_frame(index, "frame buffer size mismatch"))?;

        self.frames_decoded += 1;
        Ok(VideoFrame::new(index, rgb))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        tracing::debug!(
            path = %self.path.display(),
            frames_decoded = self.frames_decoded,
            "Released video"
        );
    }
}
