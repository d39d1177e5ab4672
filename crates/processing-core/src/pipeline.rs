//! The detection pipeline: sample, classify, compact, infer, correlate, plan.
//!
//! Frame decoding and pixel matching stay behind the [`FrameSource`] and
//! [`FrameClassifier`] traits so this module only deals in seconds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use reelcut_common::error::ReelcutResult;

use crate::category::{Category, CategoryPoints};
use crate::correlate::{correlate, CorrelatedSession, EventPoints};
use crate::planner::{plan_segments, ExportRequest, PlannerConfig};
use crate::runs::{dedup, runs_of, Run};
use crate::sample_clock::SampleClock;
use crate::session::{build_sessions, DEFAULT_MIN_SESSION_SECS};

/// Random-access decoded frames of one video.
pub trait FrameSource {
    type Frame;

    /// Number of frames in the stream.
    fn frame_count(&self) -> u64;

    /// Frames per second.
    fn frame_rate(&self) -> f64;

    /// Decode the frame at `index`. Past-the-end or undecodable frames
    /// must return [`reelcut_common::ReelcutError::UnreadableFrame`].
    fn read_frame(&mut self, index: u64) -> ReelcutResult<Self::Frame>;
}

/// Decides whether a frame belongs to a category.
pub trait FrameClassifier<F> {
    fn classify(&self, frame: &F, category: Category) -> ReelcutResult<bool>;
}

/// What to do when a sampled frame cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramePolicy {
    /// Fail the whole analysis.
    #[default]
    Abort,
    /// Log the frame and keep scanning.
    SkipAndLog,
}

/// Pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sampling cadence and run-continuity step, in seconds.
    pub check_interval_secs: u32,

    /// Gaps between transition runs must exceed this to form a session.
    pub min_session_secs: u32,

    pub planner: PlannerConfig,

    pub frame_policy: FramePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 1,
            min_session_secs: DEFAULT_MIN_SESSION_SECS,
            planner: PlannerConfig::default(),
            frame_policy: FramePolicy::Abort,
        }
    }
}

/// Counters from the frame scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub sampled_frames: usize,
    pub skipped_frames: usize,
}

/// Everything the pipeline derived for one video.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightPlan {
    pub source: PathBuf,
    pub scan: ScanSummary,
    pub transition_runs: Vec<Run>,
    pub events: EventPoints,
    pub sessions: Vec<CorrelatedSession>,
    pub requests: Vec<ExportRequest>,
}

/// Walk the video backward and record every category match by second.
pub fn collect_points<S, C>(
    source: &mut S,
    classifier: &C,
    config: &PipelineConfig,
) -> ReelcutResult<(CategoryPoints, ScanSummary)>
where
    S: FrameSource,
    C: FrameClassifier<S::Frame>,
{
    let clock = SampleClock::new(
        source.frame_count(),
        source.frame_rate(),
        config.check_interval_secs,
    )?;
    let total_samples = clock.len();
    tracing::info!(
        frames = source.frame_count(),
        frame_rate = source.frame_rate(),
        step = clock.step(),
        samples = total_samples,
        "Scanning video"
    );

    let mut points = CategoryPoints::new();
    let mut summary = ScanSummary::default();

    for index in clock.clone() {
        let frame = match source.read_frame(index) {
            Ok(frame) => frame,
            Err(e) if e.is_unreadable_frame() && config.frame_policy == FramePolicy::SkipAndLog => {
                tracing::warn!(frame = index, error = %e, "Skipping unreadable frame");
                summary.skipped_frames += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let second = clock.second_of(index);
        for category in Category::ALL {
            if classifier.classify(&frame, category)? {
                points.record(category, second);
            }
        }

        summary.sampled_frames += 1;
        if summary.sampled_frames % 600 == 0 {
            tracing::debug!(
                sampled = summary.sampled_frames,
                total = total_samples,
                "Scan progress"
            );
        }
    }

    tracing::info!(
        sampled = summary.sampled_frames,
        skipped = summary.skipped_frames,
        transition = points.transition.len(),
        kill = points.kill.len(),
        death = points.death.len(),
        win = points.win.len(),
        "Scan complete"
    );

    Ok((points, summary))
}

/// Sort each category and compact it: runs for transitions, run heads for events.
pub fn compact(mut points: CategoryPoints, interval: u32) -> (Vec<Run>, EventPoints) {
    points.sort();
    let runs = runs_of(&points.transition, interval);
    let events = EventPoints {
        kill: dedup(&points.kill, interval),
        death: dedup(&points.death, interval),
        win: dedup(&points.win, interval),
    };
    (runs, events)
}

/// Turn collected points into a plan. Nothing is planned if inference fails.
pub fn plan_from_points(
    video: &Path,
    points: CategoryPoints,
    scan: ScanSummary,
    config: &PipelineConfig,
) -> ReelcutResult<HighlightPlan> {
    let (transition_runs, events) = compact(points, config.check_interval_secs);
    let sessions = build_sessions(&transition_runs, config.min_session_secs)?;
    let correlated = correlate(&sessions, &events);
    let requests = plan_segments(video, &correlated, &config.planner);

    tracing::info!(
        runs = transition_runs.len(),
        sessions = correlated.len(),
        requests = requests.len(),
        "Highlight plan ready"
    );

    Ok(HighlightPlan {
        source: video.to_path_buf(),
        scan,
        transition_runs,
        events,
        sessions: correlated,
        requests,
    })
}

/// Run the whole pipeline over one video.
pub fn run_pipeline<S, C>(
    video: &Path,
    source: &mut S,
    classifier: &C,
    config: &PipelineConfig,
) -> ReelcutResult<HighlightPlan>
where
    S: FrameSource,
    C: FrameClassifier<S::Frame>,
{
    let (points, scan) = collect_points(source, classifier, config)?;
    plan_from_points(video, points, scan, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_common::error::ReelcutError;
    use std::collections::HashSet;

    /// Frames are just their index.
    struct IndexSource {
        frames: u64,
        fps: f64,
        broken: HashSet<u64>,
        reads: Vec<u64>,
    }

    impl FrameSource for IndexSource {
        type Frame = u64;

        fn frame_count(&self) -> u64 {
            self.frames
        }

        fn frame_rate(&self) -> f64 {
            self.fps
        }

        fn read_frame(&mut self, index: u64) -> ReelcutResult<u64> {
            self.reads.push(index);
            if index >= self.frames || self.broken.contains(&index) {
                return Err(ReelcutError::unreadable_frame(index, "no data"));
            }
            Ok(index)
        }
    }

    /// Matches kills on even seconds only; everything else never matches.
    struct EvenKills {
        fps: f64,
    }

    impl FrameClassifier<u64> for EvenKills {
        fn classify(&self, frame: &u64, category: Category) -> ReelcutResult<bool> {
            let second = (*frame as f64 / self.fps) as u64;
            Ok(category == Category::Kill && second % 2 == 0)
        }
    }

    fn source(frames: u64, broken: &[u64]) -> IndexSource {
        IndexSource {
            frames,
            fps: 10.0,
            broken: broken.iter().copied().collect(),
            reads: Vec::new(),
        }
    }

    #[test]
    fn test_collect_points_scans_backward() {
        let mut src = source(50, &[]);
        let (points, summary) =
            collect_points(&mut src, &EvenKills { fps: 10.0 }, &PipelineConfig::default())
                .unwrap();

        assert_eq!(src.reads, vec![49, 39, 29, 19, 9]);
        assert_eq!(summary.sampled_frames, 5);
        assert_eq!(points.kill, vec![4, 2, 0]);
        assert!(points.transition.is_empty());
    }

    #[test]
    fn test_unreadable_frame_aborts_by_default() {
        let mut src = source(50, &[29]);
        let err = collect_points(&mut src, &EvenKills { fps: 10.0 }, &PipelineConfig::default())
            .unwrap_err();
        assert!(err.is_unreadable_frame());
        assert_eq!(src.reads, vec![49, 39, 29]);
    }

    #[test]
    fn test_unreadable_frame_skipped_when_configured() {
        let mut src = source(50, &[29]);
        let config = PipelineConfig {
            frame_policy: FramePolicy::SkipAndLog,
            ..Default::default()
        };
        let (points, summary) =
            collect_points(&mut src, &EvenKills { fps: 10.0 }, &config).unwrap();
        assert_eq!(summary.sampled_frames, 4);
        assert_eq!(summary.skipped_frames, 1);
        assert_eq!(points.kill, vec![4, 0]);
    }

    #[test]
    fn test_no_transitions_aborts_before_planning() {
        let mut src = source(50, &[]);
        let err = run_pipeline(
            Path::new("match.mp4"),
            &mut src,
            &EvenKills { fps: 10.0 },
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReelcutError::NoTransitionRuns));
    }

    #[test]
    fn test_compact_sorts_each_category() {
        let mut points = CategoryPoints::new();
        for s in [612, 41, 610, 40, 611, 42] {
            points.record(Category::Transition, s);
        }
        for s in [82, 81, 163] {
            points.record(Category::Kill, s);
        }
        let (runs, events) = compact(points, 1);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].start_secs, 40);
        assert_eq!(runs[1].member_count, 3);
        assert_eq!(events.kill, vec![81, 163]);
    }
}
