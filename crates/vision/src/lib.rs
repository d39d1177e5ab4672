//! reelcut Vision
//!
//! Concrete collaborators for the detection pipeline:
//! - **Frame source:** ffprobe metadata and single-frame ffmpeg decodes
//! - **Matching:** normalized cross-correlation and the darkness check
//! - **Classifier:** per-category crops against reference patterns
//!
//! [`analyze_video`] ties them to the processing core for one video file.

pub mod analyze;
pub mod classifier;
pub mod frame;
pub mod matcher;
pub mod probe;
pub mod source;

pub use analyze::{analyze_video, VideoAnalysis};
pub use classifier::{PatternDescriptor, TemplateClassifier};
pub use frame::VideoFrame;
pub use probe::{probe_video, VideoInfo};
pub use source::FfmpegFrameSource;
