use lanemark_protocol::LaneLayout;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutEngine;
use crate::model::{Lane, LaneKey};
use crate::scale::YearPosition;

/// Layout of one lane within a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneResult {
    pub key: LaneKey,
    pub layout: LaneLayout,
}

/// Layouts for every lane of a timeline, stacked top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub lanes: Vec<LaneResult>,
}

impl TimelineLayout {
    pub fn lane(&self, key: &LaneKey) -> Option<&LaneLayout> {
        self.lanes
            .iter()
            .find(|lane| &lane.key == key)
            .map(|lane| &lane.layout)
    }

    /// Sum of all lane heights (px).
    pub fn total_height(&self) -> f64 {
        self.lanes.iter().map(|lane| lane.layout.row_height).sum()
    }

    /// Placements across all lanes that may overlap another label.
    pub fn forced_overlaps(&self) -> usize {
        self.lanes
            .iter()
            .map(|lane| lane.layout.diagnostics.forced)
            .sum()
    }
}

/// Lay out every lane independently with the same engine and year axis.
pub fn layout_timeline(
    engine: &LayoutEngine,
    lanes: &[Lane],
    scale: &impl YearPosition,
) -> TimelineLayout {
    let lanes: Vec<LaneResult> = lanes
        .iter()
        .map(|lane| {
            let _span = tracing::debug_span!("lane", key = %lane.key).entered();
            LaneResult {
                key: lane.key.clone(),
                layout: engine.layout(&lane.entries, scale),
            }
        })
        .collect();

    let timeline = TimelineLayout { lanes };
    let forced = timeline.forced_overlaps();
    if forced > 0 {
        tracing::warn!(forced, "timeline has overlapping labels");
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanemark_protocol::Entry;

    #[test]
    fn lanes_do_not_interact() {
        let engine = LayoutEngine::default();
        let scale = |year: f64| year;
        let mut a = Lane::new(LaneKey::new("T", "a"));
        a.entries.push(Entry::new("x", 50.0, "Same spot", "Lee, J."));
        let mut b = Lane::new(LaneKey::new("T", "b"));
        b.entries.push(Entry::new("y", 50.0, "Same spot", "Lee, J."));

        let timeline = layout_timeline(&engine, &[a, b], &scale);
        assert_eq!(timeline.lanes.len(), 2);
        for lane in &timeline.lanes {
            assert_eq!(
                lane.layout.placements[0].tier,
                lanemark_protocol::Tier::Above
            );
        }
        assert_eq!(timeline.total_height(), 2.0 * 112.0);
        assert_eq!(timeline.forced_overlaps(), 0);
        assert!(timeline.lane(&LaneKey::new("T", "b")).is_some());
    }
}
