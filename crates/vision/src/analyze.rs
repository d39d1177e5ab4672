//! Entry point: analyze one video file into a highlight plan.

use std::path::{Path, PathBuf};

use reelcut_common::config::AppConfig;
use reelcut_common::error::ReelcutResult;
use reelcut_processing_core::pipeline::{run_pipeline, FramePolicy, HighlightPlan, PipelineConfig};

use crate::classifier::TemplateClassifier;
use crate::source::FfmpegFrameSource;

/// Everything needed to analyze one video.
#[derive(Debug, Clone)]
pub struct VideoAnalysis {
    pub video: PathBuf,
    pub classifier: TemplateClassifier,
    pub pipeline: PipelineConfig,
}

impl VideoAnalysis {
    /// Build an analysis from application config and already loaded patterns,
    /// so a batch loads its reference images once.
    pub fn with_classifier(
        video: &Path,
        classifier: TemplateClassifier,
        config: &AppConfig,
    ) -> Self {
        let pipeline = PipelineConfig {
            check_interval_secs: config.analysis.check_interval_secs,
            min_session_secs: config.analysis.min_session_secs,
            frame_policy: if config.analysis.skip_unreadable_frames {
                FramePolicy::SkipAndLog
            } else {
                FramePolicy::Abort
            },
            ..Default::default()
        };
        Self {
            video: video.to_path_buf(),
            classifier,
            pipeline,
        }
    }
}

/// Open the video, run the full pipeline, and release the video on every path.
pub fn analyze_video(analysis: &VideoAnalysis) -> ReelcutResult<HighlightPlan> {
    let _span = tracing::info_span!("analyze", video = %analysis.video.display()).entered();

    let mut source = FfmpegFrameSource::open(&analysis.video)?;
    let plan = run_pipeline(
        &analysis.video,
        &mut source,
        &analysis.classifier,
        &analysis.pipeline,
    );
    drop(source);
    plan
}
