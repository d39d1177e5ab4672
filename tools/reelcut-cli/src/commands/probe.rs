//! Show video stream information.

use std::path::PathBuf;

use anyhow::Context;

use reelcut_common::config::AppConfig;
use reelcut_processing_core::sample_clock::SampleClock;
use reelcut_vision::{probe_video, VideoInfo};

pub fn run(video: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let info = probe_video(&video).with_context(|| format!("Failed to probe {}", video.display()))?;

    println!("Video: {}", video.display());
    println!("  Resolution: {}x{}", info.width, info.height);
    println!("  Frame rate: {:.3} fps", info.frame_rate);
    println!("  Frames: {}", info.frame_count);
    println!("  Duration: {:.1}s", info.duration_secs());
    println!(
        "  {}",
        sampling_summary(&info, config.analysis.check_interval_secs)?
    );

    if info.width != 1280 || info.height != 720 {
        println!();
        println!("[WARN] Detection regions assume a 1280x720 frame.");
    }

    Ok(())
}

/// How many frames an analysis at `interval_secs` would sample.
fn sampling_summary(info: &VideoInfo, interval_secs: u32) -> anyhow::Result<String> {
    let clock = SampleClock::new(info.frame_count, info.frame_rate, interval_secs)?;
    Ok(format!(
        "Samples at {}s interval: {} (every {} frames)",
        interval_secs,
        clock.len(),
        clock.step()
    ))
}
