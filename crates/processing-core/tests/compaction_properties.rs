use std::path::Path;

use proptest::prelude::*;

use reelcut_processing_core::correlate::{correlate, CorrelatedSession, EventPoints};
use reelcut_processing_core::planner::{plan_segments, ExportLabel, PlannerConfig};
use reelcut_processing_core::runs::{dedup, runs_of};
use reelcut_processing_core::session::{build_sessions, PlaySession};

fn sorted_seconds(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..2_000, 0..max_len).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

proptest! {
    #[test]
    fn dedup_keeps_exactly_the_run_minimums(s in sorted_seconds(200), k in 1u32..5) {
        let heads = dedup(&s, k);
        let run_starts: Vec<u32> = runs_of(&s, k).iter().map(|r| r.start_secs).collect();
        prop_assert_eq!(&heads, &run_starts);

        // A kept second is one its predecessor does not continue into.
        let openers: Vec<u32> = s
            .iter()
            .enumerate()
            .filter(|(i, v)| *i == 0 || v.checked_sub(s[i - 1]) != Some(k))
            .map(|(_, v)| *v)
            .collect();
        prop_assert_eq!(heads, openers);
    }

    #[test]
    fn run_members_cover_the_input(s in sorted_seconds(300), k in 1u32..5) {
        let runs = runs_of(&s, k);
        let total: u32 = runs.iter().map(|r| r.member_count).sum();
        prop_assert_eq!(total as usize, s.len());
        prop_assert!(runs.iter().all(|r| r.member_count >= 1));
    }

    #[test]
    fn sessions_always_exceed_minimum(s in sorted_seconds(300), min in 0u32..400) {
        let runs = runs_of(&s, 1);
        match build_sessions(&runs, min) {
            Ok(sessions) => {
                for session in sessions {
                    prop_assert!(session.end_secs > session.start_secs);
                    prop_assert!(session.end_secs - session.start_secs > min);
                }
            }
            Err(_) => prop_assert!(s.is_empty()),
        }
    }

    #[test]
    fn correlated_events_are_strictly_inside(
        start in 0u32..1_000,
        len in 1u32..1_000,
        kills in sorted_seconds(50),
        deaths in sorted_seconds(50),
    ) {
        let session = PlaySession { start_secs: start, end_secs: start + len };
        let events = EventPoints { kill: kills.clone(), death: deaths, win: vec![] };
        let correlated = correlate(&[session], &events);

        prop_assert!(correlated[0].kill_secs.iter().all(|&v| start < v && v < start + len));
        prop_assert!(!correlated[0].kill_secs.contains(&start));
        prop_assert!(!correlated[0].kill_secs.contains(&(start + len)));
        let expected = kills.iter().filter(|&&v| start < v && v < start + len).count();
        prop_assert_eq!(correlated[0].kill_secs.len(), expected);
    }

    #[test]
    fn planner_counts_follow_win_policy(
        kills in prop::collection::vec(200u32..400, 0..10),
        deaths in prop::collection::vec(200u32..400, 0..10),
        wins in prop::collection::vec(200u32..400, 0..3),
    ) {
        let correlated = CorrelatedSession {
            session: PlaySession { start_secs: 100, end_secs: 500 },
            kill_secs: kills.clone(),
            death_secs: deaths.clone(),
            win_secs: wins.clone(),
        };
        let requests = plan_segments(Path::new("m.mp4"), &[correlated], &PlannerConfig::default());
        let expected = if wins.len() == 1 { 1 + kills.len() + deaths.len() } else { 0 };
        prop_assert_eq!(requests.len(), expected);
    }

    #[test]
    fn padded_windows_never_qualify_as_sessions(j in 0u32..100_000) {
        let config = PlannerConfig::default();
        let correlated = CorrelatedSession {
            session: PlaySession { start_secs: 0, end_secs: u32::MAX },
            kill_secs: vec![j],
            death_secs: vec![j],
            win_secs: vec![1],
        };
        let requests = plan_segments(Path::new("m.mp4"), &[correlated], &config);
        for request in requests.iter().filter(|r| r.label != ExportLabel::Highlight) {
            prop_assert!(
                PlaySession::candidate(request.start_secs, request.end_secs, 180).is_none()
            );
        }
    }
}
