//! The four fixed detection categories and the per-category point collector.

use serde::{Deserialize, Serialize};

use crate::sample_clock::TimestampSecond;

/// Visual category a sampled frame is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Black / loading screen between matches.
    Transition,
    Kill,
    Death,
    Win,
}

impl Category {
    /// Classification order used for every sampled frame.
    pub const ALL: [Category; 4] = [
        Category::Transition,
        Category::Kill,
        Category::Death,
        Category::Win,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Transition => "transition",
            Category::Kill => "kill",
            Category::Death => "death",
            Category::Win => "win",
        }
    }

    /// Default crop region in 1280x720 frame coordinates.
    pub fn default_crop(self) -> CropRegion {
        match self {
            Category::Transition => CropRegion::FULL_FRAME,
            Category::Kill => CropRegion::new(660, 695, 500, 785),
            Category::Death => CropRegion::new(640, 680, 1000, 1280),
            Category::Win => CropRegion::new(0, 100, 0, 190),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open pixel rectangle: rows `top..bottom`, columns `left..right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropRegion {
    /// Covers any frame; clamping reduces it to the real frame size.
    pub const FULL_FRAME: CropRegion = CropRegion {
        top: 0,
        bottom: u32::MAX,
        left: 0,
        right: u32::MAX,
    };

    pub const fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Clamp to a `width × height` frame, returning `(x, y, w, h)`.
    ///
    /// Out-of-range bounds shrink the rectangle the way slicing does, so a
    /// region lying entirely outside the frame has zero width or height.
    pub fn clamp_to(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let left = self.left.min(width);
        let right = self.right.min(width).max(left);
        let top = self.top.min(height);
        let bottom = self.bottom.min(height).max(top);
        (left, top, right - left, bottom - top)
    }
}

/// Unsorted per-category match seconds gathered during one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryPoints {
    pub transition: Vec<TimestampSecond>,
    pub kill: Vec<TimestampSecond>,
    pub death: Vec<TimestampSecond>,
    pub win: Vec<TimestampSecond>,
}

impl CategoryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `category` matched at `second`.
    pub fn record(&mut self, category: Category, second: TimestampSecond) {
        self.points_mut(category).push(second);
    }

    pub fn points(&self, category: Category) -> &[TimestampSecond] {
        match category {
            Category::Transition => &self.transition,
            Category::Kill => &self.kill,
            Category::Death => &self.death,
            Category::Win => &self.win,
        }
    }

    fn points_mut(&mut self, category: Category) -> &mut Vec<TimestampSecond> {
        match category {
            Category::Transition => &mut self.transition,
            Category::Kill => &mut self.kill,
            Category::Death => &mut self.death,
            Category::Win => &mut self.win,
        }
    }

    /// Sort every category ascending, independently.
    pub fn sort(&mut self) {
        for category in Category::ALL {
            self.points_mut(category).sort_unstable();
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.points(*c).len()).sum()
    }
}
