//! Tunable constants of the label layout.
//!
//! Defaults are calibrated for a 2040px lane rendered in a monospace face
//! (title at 10.5px, author line at 9px, ~0.815em advance per glyph, rounded
//! up for a small safety margin).

use lanemark_protocol::{Side, Tier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content_width must be a positive number, got {0}")]
    ContentWidth(f64),
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("shift_steps must not be empty")]
    NoShifts,
    #[error("shift_steps must start at 0, got {0}")]
    FirstShiftNotZero(f64),
    #[error("shift_steps must be strictly ascending ({prev} then {next})")]
    ShiftsNotAscending { prev: f64, next: f64 },
    #[error("tier needs for {side:?} must not shrink with level ({outer} after {inner})")]
    TierNeedsShrink { side: Side, inner: f64, outer: f64 },
}

/// Vertical extent, in pixels from the axis, that each tier's label reaches.
/// Index 0 is the innermost level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierNeeds {
    pub above: [f64; Tier::LEVELS],
    pub below: [f64; Tier::LEVELS],
}

impl TierNeeds {
    pub fn need(&self, tier: Tier) -> f64 {
        self.side(tier.side())[tier.level()]
    }

    pub fn side(&self, side: Side) -> &[f64; Tier::LEVELS] {
        match side {
            Side::Above => &self.above,
            Side::Below => &self.below,
        }
    }
}

impl Default for TierNeeds {
    fn default() -> Self {
        // Label ~30px tall, levels spaced 34px apart, 12px clearance from the axis.
        Self {
            above: [44.0, 78.0, 112.0],
            below: [44.0, 78.0, 112.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixel width of one lane's content area.
    pub content_width: f64,
    /// Approximate advance per character of the title line.
    pub title_char_width: f64,
    /// Approximate advance per character of the author line.
    pub author_char_width: f64,
    /// Added to each side of a label's box.
    pub padding: f64,
    /// Minimum horizontal distance between two labels in the same tier.
    pub gap: f64,
    /// Horizontal shift magnitudes tried per tier, ascending, starting at 0.
    /// Each nonzero magnitude is tried leftward first, then rightward.
    pub shift_steps: Vec<f64>,
    pub tier_needs: TierNeeds,
    pub top_margin: f64,
    pub bottom_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            content_width: 2040.0,
            title_char_width: 9.0,
            author_char_width: 7.5,
            padding: 10.0,
            gap: 6.0,
            shift_steps: vec![0.0, 22.0, 44.0, 66.0, 88.0, 110.0, 135.0, 165.0, 200.0],
            tier_needs: TierNeeds::default(),
            top_margin: 12.0,
            bottom_margin: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: LayoutConfig = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.content_width.is_finite() && self.content_width > 0.0) {
            return Err(ConfigError::ContentWidth(self.content_width));
        }

        let scalars = [
            ("title_char_width", self.title_char_width),
            ("author_char_width", self.author_char_width),
            ("padding", self.padding),
            ("gap", self.gap),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
        ];
        for (field, value) in scalars {
            check_non_negative(field, value)?;
        }

        let Some(&first) = self.shift_steps.first() else {
            return Err(ConfigError::NoShifts);
        };
        if first != 0.0 {
            return Err(ConfigError::FirstShiftNotZero(first));
        }
        for pair in self.shift_steps.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if !next.is_finite() || next <= prev {
                return Err(ConfigError::ShiftsNotAscending { prev, next });
            }
        }

        for side in [Side::Above, Side::Below] {
            let needs = self.tier_needs.side(side);
            for &need in needs {
                check_non_negative("tier_needs", need)?;
            }
            for pair in needs.windows(2) {
                if pair[1] < pair[0] {
                    return Err(ConfigError::TierNeedsShrink {
                        side,
                        inner: pair[0],
                        outer: pair[1],
                    });
                }
            }
        }

        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
