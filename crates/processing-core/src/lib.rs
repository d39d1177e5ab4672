//! reelcut Processing Core: highlight detection
//!
//! Turns per-frame category matches into a cut list:
//! - **Sample clock:** which frames to inspect and which second each lands on
//! - **Run compaction:** transition runs and deduplicated event seconds
//! - **Session inference:** gameplay between transition runs
//! - **Correlation & planning:** events per session, export requests
//!
//! This crate is pure computation. Frame decoding and pixel matching are
//! reached only through the [`pipeline::FrameSource`] and
//! [`pipeline::FrameClassifier`] traits.

pub mod category;
pub mod correlate;
pub mod pipeline;
pub mod planner;
pub mod runs;
pub mod sample_clock;
pub mod session;

pub use category::{Category, CategoryPoints, CropRegion};
pub use pipeline::{run_pipeline, FramePolicy, HighlightPlan, PipelineConfig};
pub use planner::{ExportLabel, ExportRequest};
