use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::tier::Tier;

/// Horizontal pixel interval `[left, right]` claimed by one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub left: f64,
    pub right: f64,
}

impl Span {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Interval of width `2 * half_width` centered on `center`.
    pub fn centered(center: f64, half_width: f64) -> Self {
        Self::new(center - half_width, center + half_width)
    }

    /// Whether the two spans come closer than `gap` pixels (or overlap).
    pub fn conflicts(&self, other: &Span, gap: f64) -> bool {
        self.left < other.right + gap && self.right > other.left - gap
    }

    /// Whether the span lies entirely within `[0, width]`.
    pub fn within(&self, width: f64) -> bool {
        self.left >= 0.0 && self.right <= width
    }
}

/// How a placement was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// First collision-free candidate of the ranked search.
    Ranked,
    /// No in-bounds candidate was free; the label was pushed inside the lane
    /// and the first free tier was taken.
    Clamped,
    /// Nothing was free at all. The label sits in the outermost above tier
    /// with no shift and may overlap another label.
    Forced,
}

/// Where one entry's label ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub id: SharedStr,
    pub tier: Tier,
    /// Signed pixel offset of the label center from the entry's dot.
    pub shift: f64,
    pub resolution: Resolution,
    /// Pixel interval the label occupies within the lane's content width.
    pub span: Span,
}

/// Counts of placements that needed a fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDiagnostics {
    pub clamped: usize,
    /// Placements that may overlap another label. Nonzero means the lane
    /// is too dense for the configured tiers and shifts.
    pub forced: usize,
}

/// Label placements for one lane plus the vertical extent they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    /// In processing order (ascending year, input order among equal years).
    pub placements: Vec<LabelPlacement>,
    /// Pixels from the lane's top edge to the axis line.
    pub center_offset: f64,
    /// Total lane height in pixels.
    pub row_height: f64,
    pub diagnostics: LayoutDiagnostics,
}

impl LaneLayout {
    pub fn placement(&self, id: &str) -> Option<&LabelPlacement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn has_forced_overlap(&self) -> bool {
        self.diagnostics.forced > 0
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
