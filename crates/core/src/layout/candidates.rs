use lanemark_protocol::Tier;

/// One (tier, horizontal shift) option for a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub tier: Tier,
    pub shift: f64,
    pub cost: usize,
}

/// Every tier × shift combination, cheapest first.
///
/// `cost = 2 * tier level + shift step index`: two extra shift steps cost the
/// same as going one level further out from the axis. Equal costs are ordered
/// by tier (innermost level first, above before below), then by magnitude,
/// then leftward before rightward.
///
/// Independent of any lane, so it is built once per engine and reused.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRanking {
    candidates: Vec<Candidate>,
}

impl CandidateRanking {
    /// `shift_steps` must be ascending magnitudes starting at 0.
    pub fn new(shift_steps: &[f64]) -> Self {
        let mut ranked = Vec::with_capacity(Tier::ALL.len() * (2 * shift_steps.len()));
        for tier in Tier::ALL {
            for (step, &magnitude) in shift_steps.iter().enumerate() {
                let cost = tier.level() * 2 + step;
                let directions: &[f64] = if magnitude == 0.0 {
                    &[1.0]
                } else {
                    &[-1.0, 1.0]
                };
                for &direction in directions {
                    let shift = direction * magnitude;
                    ranked.push((cost, tier.index(), step, Candidate { tier, shift, cost }));
                }
            }
        }
        // Stable: leftward stays ahead of rightward at equal magnitude.
        ranked.sort_by_key(|&(cost, tier, step, _)| (cost, tier, step));

        Self {
            candidates: ranked.into_iter().map(|(.., c)| c).collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateRanking {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
