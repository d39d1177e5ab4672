//! Attribute deduplicated event seconds to the sessions they fall inside.

use serde::Serialize;

use crate::sample_clock::TimestampSecond;
use crate::session::PlaySession;

/// Deduplicated, ascending event seconds for the three event categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventPoints {
    pub kill: Vec<TimestampSecond>,
    pub death: Vec<TimestampSecond>,
    pub win: Vec<TimestampSecond>,
}

/// A play session and the events strictly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelatedSession {
    pub session: PlaySession,
    pub kill_secs: Vec<TimestampSecond>,
    pub death_secs: Vec<TimestampSecond>,
    pub win_secs: Vec<TimestampSecond>,
}

fn inside(session: &PlaySession, seconds: &[TimestampSecond]) -> Vec<TimestampSecond> {
    seconds
        .iter()
        .copied()
        .filter(|s| session.contains(*s))
        .collect()
}

/// Correlate every session with the events. Inputs are left untouched.
pub fn correlate(sessions: &[PlaySession], events: &EventPoints) -> Vec<CorrelatedSession> {
    sessions
        .iter()
        .map(|session| CorrelatedSession {
            session: *session,
            kill_secs: inside(session, &events.kill),
            death_secs: inside(session, &events.death),
            win_secs: inside(session, &events.win),
        })
        .collect()
}
