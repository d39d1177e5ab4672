//! Per-category frame classification against reference patterns.

use std::path::Path;

use image::{imageops, GrayImage};

use reelcut_common::config::{AnalysisDefaults, PatternSet};
use reelcut_common::error::{ReelcutError, ReelcutResult};
use reelcut_processing_core::category::{Category, CropRegion};
use reelcut_processing_core::pipeline::FrameClassifier;

use crate::frame::VideoFrame;
use crate::matcher::{best_match_score, is_dark};

/// Default full-frame intensity sum under which a frame is a transition.
pub const DEFAULT_DARKNESS_THRESHOLD: u64 = 1_000_000;

/// Default similarity a pattern match must exceed.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.8;

/// Where to look for a pattern and how close the match must be.
#[derive(Debug, Clone)]
pub struct PatternDescriptor {
    pub crop: CropRegion,
    pub pattern: GrayImage,
    pub threshold: f32,
}

impl PatternDescriptor {
    /// Score the descriptor's crop of `frame` against its pattern.
    pub fn score(&self, frame: &VideoFrame) -> ReelcutResult<f32> {
        let gray = frame.gray();
        let (x, y, w, h) = self.crop.clamp_to(gray.width(), gray.height());
        let region = imageops::crop_imm(gray, x, y, w, h).to_image();

        best_match_score(&region, &self.pattern).ok_or_else(|| {
            ReelcutError::pattern(format!(
                "{}x{} crop of a {}x{} frame is smaller than its {}x{} pattern",
                w,
                h,
                gray.width(),
                gray.height(),
                self.pattern.width(),
                self.pattern.height()
            ))
        })
    }

    pub fn matches(&self, frame: &VideoFrame) -> ReelcutResult<bool> {
        Ok(self.score(frame)? > self.threshold)
    }
}

/// Darkness check for transitions, pattern matching for events.
#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    pub darkness_threshold: u64,
    pub kill: PatternDescriptor,
    pub death: PatternDescriptor,
    pub win: PatternDescriptor,
}

impl TemplateClassifier {
    /// Load the three reference patterns with their default crop regions.
    pub fn load(patterns: &PatternSet, analysis: &AnalysisDefaults) -> ReelcutResult<Self> {
        let descriptor = |category: Category, path: &Path| -> ReelcutResult<PatternDescriptor> {
            Ok(PatternDescriptor {
                crop: category.default_crop(),
                pattern: load_pattern(path)?,
                threshold: analysis.match_threshold,
            })
        };

        Ok(Self {
            darkness_threshold: analysis.darkness_threshold,
            kill: descriptor(Category::Kill, &patterns.kill)?,
            death: descriptor(Category::Death, &patterns.death)?,
            win: descriptor(Category::Win, &patterns.win)?,
        })
    }

    pub fn descriptor(&self, category: Category) -> Option<&PatternDescriptor> {
        match category {
            Category::Transition => None,
            Category::Kill => Some(&self.kill),
            Category::Death => Some(&self.death),
            Category::Win => Some(&self.win),
        }
    }
}

impl FrameClassifier<VideoFrame> for TemplateClassifier {
    fn classify(&self, frame: &VideoFrame, category: Category) -> ReelcutResult<bool> {
        match self.descriptor(category) {
            None => Ok(is_dark(frame.intensity_sum(), self.darkness_threshold)),
            Some(descriptor) => descriptor.matches(frame),
        }
    }
}

/// Load a reference pattern as 8-bit grayscale.
pub fn load_pattern(path: &Path) -> ReelcutResult<GrayImage> {
    if !path.exists() {
        return Err(ReelcutError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let pattern = image::open(path)?;
    let gray = crate::frame::to_gray(&pattern.to_rgb8());
    tracing::debug!(
        path = %path.display(),
        width = gray.width(),
        height = gray.height(),
        "Loaded reference pattern"
    );
    Ok(gray)
}
