//! Play-session inference from transition runs.
//!
//! Gameplay is assumed to sit between two transition runs. The gap from
//! the end of one run to the start of the next becomes a session when it
//! is longer than the minimum session length.

use serde::Serialize;

use reelcut_common::error::{ReelcutError, ReelcutResult};

use crate::runs::Run;
use crate::sample_clock::TimestampSecond;

/// Default minimum session length in seconds.
pub const DEFAULT_MIN_SESSION_SECS: u32 = 180;

/// An inferred stretch of continuous gameplay, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaySession {
    pub start_secs: TimestampSecond,
    pub end_secs: TimestampSecond,
}

impl PlaySession {
    /// A session for `start..end`, if the gap exceeds `min_session_secs`.
    pub fn candidate(
        start_secs: TimestampSecond,
        end_secs: TimestampSecond,
        min_session_secs: u32,
    ) -> Option<Self> {
        let gap = end_secs.checked_sub(start_secs)?;
        (gap > min_session_secs).then_some(Self {
            start_secs,
            end_secs,
        })
    }

    pub fn duration_secs(&self) -> u32 {
        self.end_secs - self.start_secs
    }

    /// Strictly inside the session; boundary seconds are excluded.
    pub fn contains(&self, second: TimestampSecond) -> bool {
        self.start_secs < second && second < self.end_secs
    }
}

/// Infer sessions from runs sorted by start second.
///
/// The first run only seeds the left boundary. Fails with
/// [`ReelcutError::NoTransitionRuns`] when `runs` is empty.
pub fn build_sessions(runs: &[Run], min_session_secs: u32) -> ReelcutResult<Vec<PlaySession>> {
    let (first, rest) = runs.split_first().ok_or(ReelcutError::NoTransitionRuns)?;

    let mut sessions = Vec::new();
    let mut cursor = first.end_secs();
    for run in rest {
        if let Some(session) = PlaySession::candidate(cursor, run.start_secs, min_session_secs) {
            tracing::debug!(
                start = session.start_secs,
                end = session.end_secs,
                "Play session inferred"
            );
            sessions.push(session);
        }
        cursor = run.end_secs();
    }

    Ok(sessions)
}
