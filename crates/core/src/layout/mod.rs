//! Collision-free label placement for one lane.
//!
//! Entries are processed left to right (by year). Each one walks the ranked
//! (tier, shift) candidates and takes the first whose label span stays inside
//! the lane and keeps `gap` pixels away from every label already in that
//! tier. Earlier entries get first pick; a placed label never moves.
//!
//! When no candidate fits, the label is pushed just inside the lane edge and
//! the first free tier is taken. If even that fails the label is forced into
//! the outermost above tier unshifted, which may overlap; such placements are
//! counted in [`LayoutDiagnostics::forced`] and do not occupy their tier.
//!
//! The lane's vertical extent is derived from the tiers actually used, so a
//! lane whose labels all fit next to the axis stays short.

pub mod candidates;
pub mod footprint;
mod occupancy;

use lanemark_protocol::{
    Entry, LabelPlacement, LaneLayout, LayoutDiagnostics, Resolution, Side, Span, Tier,
};
use tracing::{debug, warn};

use crate::config::{ConfigError, LayoutConfig};
use crate::scale::YearPosition;
use candidates::CandidateRanking;
use footprint::FootprintEstimator;
use occupancy::Occupancy;

/// Reusable placement engine. Holds only immutable configuration and the
/// precomputed candidate ranking, so one instance can serve every lane.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    estimator: FootprintEstimator,
    ranking: CandidateRanking,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: LayoutConfig) -> Self {
        Self {
            estimator: FootprintEstimator::new(&config),
            ranking: CandidateRanking::new(&config.shift_steps),
            config,
        }
    }

    /// Place every entry of one lane. Never fails; see the module docs for
    /// the fallback order.
    pub fn layout(&self, entries: &[Entry], scale: &impl YearPosition) -> LaneLayout {
        let _span = tracing::debug_span!("lane_layout", entries = entries.len()).entered();

        // Stable, so entries sharing a year keep their input order.
        let mut order: Vec<&Entry> = entries.iter().collect();
        order.sort_by(|a, b| a.year.total_cmp(&b.year));

        let width = self.config.content_width;
        let mut occupancy = Occupancy::new(self.config.gap);
        let mut placements = Vec::with_capacity(entries.len());
        let mut diagnostics = LayoutDiagnostics::default();

        for entry in order {
            let center = scale.percent_for_year(entry.year) / 100.0 * width;
            let half_width = self
                .estimator
                .estimate(&entry.title, &entry.authors, entry.year)
                / 2.0;

            let (tier, shift, resolution) = self.choose_slot(&occupancy, center, half_width);
            let span = Span::centered(center + shift, half_width);

            match resolution {
                Resolution::Ranked => {}
                Resolution::Clamped => {
                    diagnostics.clamped += 1;
                    debug!(id = %entry.id, %tier, shift, "label clamped into lane");
                }
                Resolution::Forced => {
                    diagnostics.forced += 1;
                    warn!(
                        id = %entry.id,
                        year = entry.year,
                        lane_entries = entries.len(),
                        "no free label slot; forcing overlap in {tier}"
                    );
                }
            }

            // A forced label overlaps by definition; later entries still see
            // only the spans that were actually free when taken.
            if resolution != Resolution::Forced {
                occupancy.claim(tier, span);
            }
            placements.push(LabelPlacement {
                id: entry.id.clone(),
                tier,
                shift,
                resolution,
                span,
            });
        }

        let (center_offset, row_height) = self.lane_extent(&placements);
        debug!(
            center_offset,
            row_height,
            clamped = diagnostics.clamped,
            forced = diagnostics.forced,
            "lane laid out"
        );

        LaneLayout {
            placements,
            center_offset,
            row_height,
            diagnostics,
        }
    }

    fn choose_slot(
        &self,
        occupancy: &Occupancy,
        center: f64,
        half_width: f64,
    ) -> (Tier, f64, Resolution) {
        let width = self.config.content_width;

        for candidate in &self.ranking {
            let span = Span::centered(center + candidate.shift, half_width);
            if span.within(width) && occupancy.is_free(candidate.tier, &span) {
                return (candidate.tier, candidate.shift, Resolution::Ranked);
            }
        }

        let shift = clamp_shift(center, half_width, width);
        let span = Span::centered(center + shift, half_width);
        if let Some(tier) = Tier::ALL
            .into_iter()
            .find(|&tier| occupancy.is_free(tier, &span))
        {
            return (tier, shift, Resolution::Clamped);
        }

        (Tier::AboveHighest, 0.0, Resolution::Forced)
    }

    /// `(center_offset, row_height)` for the tiers used by `placements`.
    /// The innermost tier's need is always reserved on both sides.
    fn lane_extent(&self, placements: &[LabelPlacement]) -> (f64, f64) {
        let needs = &self.config.tier_needs;
        let mut above = needs.need(Tier::Above);
        let mut below = needs.need(Tier::Below);
        for placement in placements {
            let need = needs.need(placement.tier);
            match placement.tier.side() {
                Side::Above => above = above.max(need),
                Side::Below => below = below.max(need),
            }
        }

        let center_offset = self.config.top_margin + above;
        (center_offset, center_offset + below + self.config.bottom_margin)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::from_valid(LayoutConfig::default())
    }
}

/// Smallest shift that moves `[center - half_width, center + half_width]`
/// inside `[0, width]`. A label wider than the lane is pinned to the left edge.
fn clamp_shift(center: f64, half_width: f64, width: f64) -> f64 {
    if center - half_width < 0.0 {
        half_width - center
    } else if center + half_width > width {
        width - center - half_width
    } else {
        0.0
    }
}
