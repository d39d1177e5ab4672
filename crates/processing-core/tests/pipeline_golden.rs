use std::collections::HashSet;
use std::path::Path;

use reelcut_common::error::{ReelcutError, ReelcutResult};
use reelcut_processing_core::category::Category;
use reelcut_processing_core::pipeline::{run_pipeline, FrameClassifier, FrameSource, PipelineConfig};
use reelcut_processing_core::planner::ExportLabel;
use reelcut_processing_core::session::PlaySession;

const FPS: f64 = 30.0;
const DURATION_SECS: u64 = 1_000;

const KILLS: [u32; 15] = [
    81, 163, 206, 241, 258, 287, 345, 463, 477, 541, 646, 673, 711, 728, 801,
];
const DEATHS: [u32; 17] = [
    105, 182, 208, 243, 269, 294, 313, 336, 467, 503, 521, 545, 655, 687, 773, 839, 891,
];
const WINS: [u32; 2] = [0, 364];

/// A recorded match where every frame is identified by its index.
struct RecordedMatch;

impl FrameSource for RecordedMatch {
    type Frame = u64;

    fn frame_count(&self) -> u64 {
        DURATION_SECS * FPS as u64
    }

    fn frame_rate(&self) -> f64 {
        FPS
    }

    fn read_frame(&mut self, index: u64) -> ReelcutResult<u64> {
        if index >= self.frame_count() {
            return Err(ReelcutError::unreadable_frame(index, "past end"));
        }
        Ok(index)
    }
}

/// Answers from per-second ground truth. Events stay on screen a little
/// longer than one sample so deduplication has work to do.
struct GroundTruth {
    transition: HashSet<u32>,
    kill: HashSet<u32>,
    death: HashSet<u32>,
    win: HashSet<u32>,
}

impl GroundTruth {
    fn new() -> Self {
        let spread = |seconds: &[u32], lasting: u32| -> HashSet<u32> {
            seconds
                .iter()
                .flat_map(|&s| s..s + lasting)
                .collect()
        };

        let mut transition: HashSet<u32> = (39..42).collect();
        transition.extend(389..613);
        transition.extend(969..974);

        Self {
            transition,
            kill: spread(&KILLS, 2),
            death: spread(&DEATHS, 2),
            win: spread(&WINS, 3),
        }
    }
}

impl FrameClassifier<u64> for GroundTruth {
    fn classify(&self, frame: &u64, category: Category) -> ReelcutResult<bool> {
        let second = (*frame as f64 / FPS) as u32;
        let set = match category {
            Category::Transition => &self.transition,
            Category::Kill => &self.kill,
            Category::Death => &self.death,
            Category::Win => &self.win,
        };
        Ok(set.contains(&second))
    }
}

#[test]
fn recorded_match_produces_expected_cut_list() {
    let plan = run_pipeline(
        Path::new("Segment_0001.mp4"),
        &mut RecordedMatch,
        &GroundTruth::new(),
        &PipelineConfig::default(),
    )
    .expect("pipeline should succeed");

    assert_eq!(plan.scan.sampled_frames, DURATION_SECS as usize);
    assert_eq!(plan.events.kill, KILLS.to_vec());
    assert_eq!(plan.events.death, DEATHS.to_vec());
    assert_eq!(plan.events.win, WINS.to_vec());

    let sessions: Vec<PlaySession> = plan.sessions.iter().map(|c| c.session).collect();
    assert_eq!(
        sessions,
        vec![
            PlaySession {
                start_secs: 42,
                end_secs: 389
            },
            PlaySession {
                start_secs: 613,
                end_secs: 969
            },
        ]
    );
    assert_eq!(plan.sessions[0].win_secs, vec![364]);
    assert!(plan.sessions[1].win_secs.is_empty());

    // Only the first session has a single win.
    let highlights: Vec<(u32, u32)> = plan
        .requests
        .iter()
        .filter(|r| r.label == ExportLabel::Highlight)
        .map(|r| (r.start_secs, r.end_secs))
        .collect();
    assert_eq!(highlights, vec![(42, 389)]);

    let kills: Vec<(u32, u32)> = plan
        .requests
        .iter()
        .filter(|r| r.label == ExportLabel::Kill)
        .map(|r| (r.start_secs, r.end_secs))
        .collect();
    assert_eq!(
        kills,
        vec![
            (79, 83),
            (161, 165),
            (204, 208),
            (239, 243),
            (256, 260),
            (285, 289),
            (343, 347)
        ]
    );

    let deaths = plan
        .requests
        .iter()
        .filter(|r| r.label == ExportLabel::Death)
        .count();
    assert_eq!(deaths, 8);
    assert_eq!(plan.requests.len(), 1 + 7 + 8);
    assert!(plan
        .requests
        .iter()
        .all(|r| r.source == Path::new("Segment_0001.mp4")));
}

#[test]
fn wider_interval_samples_fewer_frames() {
    let config = PipelineConfig {
        check_interval_secs: 2,
        ..Default::default()
    };
    let plan = run_pipeline(
        Path::new("Segment_0001.mp4"),
        &mut RecordedMatch,
        &GroundTruth::new(),
        &config,
    )
    .expect("pipeline should succeed");

    assert_eq!(plan.scan.sampled_frames, 500);
    assert!(!plan.sessions.is_empty());
}
