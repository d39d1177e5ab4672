//! Segment planning: decide which sub-clips to cut.
//!
//! Only sessions with exactly one win detection are exported. Each one
//! yields a full-length highlight plus a short padded clip around every
//! kill and death inside it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::correlate::CorrelatedSession;
use crate::sample_clock::TimestampSecond;

/// Label attached to an exported clip; also part of its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLabel {
    Highlight,
    Kill,
    Death,
}

impl ExportLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportLabel::Highlight => "highlight",
            ExportLabel::Kill => "kill",
            ExportLabel::Death => "death",
        }
    }
}

impl std::fmt::Display for ExportLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sub-clip to cut from the source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    pub source: PathBuf,
    pub start_secs: TimestampSecond,
    pub end_secs: TimestampSecond,
    pub label: ExportLabel,
}

impl ExportRequest {
    pub fn duration_secs(&self) -> u32 {
        self.end_secs.saturating_sub(self.start_secs)
    }
}

/// Seconds added around an event second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub before_secs: u32,
    pub after_secs: u32,
}

impl Padding {
    pub const fn new(before_secs: u32, after_secs: u32) -> Self {
        Self {
            before_secs,
            after_secs,
        }
    }

    /// `[second - before, second + after]`, clamped at 0.
    pub fn around(&self, second: TimestampSecond) -> (TimestampSecond, TimestampSecond) {
        (
            second.saturating_sub(self.before_secs),
            second.saturating_add(self.after_secs),
        )
    }
}

/// Selection and padding policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub kill_padding: Padding,
    pub death_padding: Padding,
    /// A session is exported only with exactly this many win detections.
    pub required_wins: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            kill_padding: Padding::new(2, 2),
            death_padding: Padding::new(3, 1),
            required_wins: 1,
        }
    }
}

/// Plan export requests for `source` from its correlated sessions.
pub fn plan_segments(
    source: &Path,
    sessions: &[CorrelatedSession],
    config: &PlannerConfig,
) -> Vec<ExportRequest> {
    let mut requests = Vec::new();

    for correlated in sessions {
        if correlated.win_secs.len() != config.required_wins {
            continue;
        }

        let request = |(start_secs, end_secs): (TimestampSecond, TimestampSecond),
                       label: ExportLabel| ExportRequest {
            source: source.to_path_buf(),
            start_secs,
            end_secs,
            label,
        };

        let session = correlated.session;
        requests.push(request(
            (session.start_secs, session.end_secs),
            ExportLabel::Highlight,
        ));
        requests.extend(
            correlated
                .kill_secs
                .iter()
                .map(|&j| request(config.kill_padding.around(j), ExportLabel::Kill)),
        );
        requests.extend(
            correlated
                .death_secs
                .iter()
                .map(|&j| request(config.death_padding.around(j), ExportLabel::Death)),
        );
    }

    requests
}
