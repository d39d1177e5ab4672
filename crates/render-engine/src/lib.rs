//! reelcut Render Engine
//!
//! Cuts planned clips out of the source video without re-encoding.
//!
//! ```text
//! match.mp4 ──┬── -ss 42 -t 347  ──► match_highlight_42_389.mp4
//!             ├── -ss 79 -t 4    ──► match_kill_79_83.mp4
//!             └── -ss 102 -t 4   ──► match_death_102_106.mp4
//! ```
//!
//! Exports are fire-and-forget by default; [`ExportDispatcher`] can bound
//! and reap them when the caller wants to.

pub mod export;

pub use export::*;
