use lanemark_protocol::{Span, Tier};

/// Spans already claimed in each tier of the lane being laid out.
///
/// Lives for a single layout call; nothing carries over between lanes.
#[derive(Debug)]
pub(crate) struct Occupancy {
    tiers: [Vec<Span>; Tier::ALL.len()],
    gap: f64,
}

impl Occupancy {
    pub(crate) fn new(gap: f64) -> Self {
        Self {
            tiers: Default::default(),
            gap,
        }
    }

    /// Whether `span` keeps at least `gap` pixels from every span in `tier`.
    pub(crate) fn is_free(&self, tier: Tier, span: &Span) -> bool {
        !self.tiers[tier.index()]
            .iter()
            .any(|claimed| span.conflicts(claimed, self.gap))
    }

    pub(crate) fn claim(&mut self, tier: Tier, span: Span) {
        self.tiers[tier.index()].push(span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_independent() {
        let mut occ = Occupancy::new(6.0);
        occ.claim(Tier::Above, Span::new(100.0, 200.0));
        assert!(!occ.is_free(Tier::Above, &Span::new(150.0, 250.0)));
        assert!(occ.is_free(Tier::Below, &Span::new(150.0, 250.0)));
        assert!(occ.is_free(Tier::AboveHigh, &Span::new(100.0, 200.0)));
    }

    #[test]
    fn gap_is_enforced_on_both_sides() {
        let mut occ = Occupancy::new(6.0);
        occ.claim(Tier::Below, Span::new(100.0, 200.0));
        assert!(!occ.is_free(Tier::Below, &Span::new(203.0, 260.0)));
        assert!(occ.is_free(Tier::Below, &Span::new(206.0, 260.0)));
        assert!(!occ.is_free(Tier::Below, &Span::new(40.0, 97.0)));
        assert!(occ.is_free(Tier::Below, &Span::new(40.0, 94.0)));
    }
}
