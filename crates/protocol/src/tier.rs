use serde::{Deserialize, Serialize};

/// Which side of the axis a label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Above,
    Below,
}

/// One of the six vertical label positions of a lane.
///
/// Tiers come in three levels per side; level 0 hugs the axis and each
/// further level stacks one label height further out. Collision is only
/// ever checked between labels of the same tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Above,
    Below,
    AboveHigh,
    BelowLow,
    AboveHighest,
    BelowLowest,
}

impl Tier {
    /// All tiers, innermost level first and above before below within a level.
    pub const ALL: [Tier; 6] = [
        Tier::Above,
        Tier::Below,
        Tier::AboveHigh,
        Tier::BelowLow,
        Tier::AboveHighest,
        Tier::BelowLowest,
    ];

    pub const LEVELS: usize = 3;

    /// Distance class from the axis: 0 (innermost) to 2 (outermost).
    pub fn level(self) -> usize {
        match self {
            Tier::Above | Tier::Below => 0,
            Tier::AboveHigh | Tier::BelowLow => 1,
            Tier::AboveHighest | Tier::BelowLowest => 2,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Tier::Above | Tier::AboveHigh | Tier::AboveHighest => Side::Above,
            Tier::Below | Tier::BelowLow | Tier::BelowLowest => Side::Below,
        }
    }

    /// Position of this tier in [`Tier::ALL`].
    pub fn index(self) -> usize {
        self.level() * 2
            + match self.side() {
                Side::Above => 0,
                Side::Below => 1,
            }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Above => "above",
            Tier::Below => "below",
            Tier::AboveHigh => "above-high",
            Tier::BelowLow => "below-low",
            Tier::AboveHighest => "above-highest",
            Tier::BelowLowest => "below-lowest",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, tier) in Tier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
        }
    }

    #[test]
    fn levels_pair_up_across_sides() {
        assert_eq!(Tier::AboveHigh.level(), Tier::BelowLow.level());
        assert_eq!(Tier::AboveHighest.side(), Side::Above);
        assert_eq!(Tier::BelowLowest.side(), Side::Below);
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        let json = serde_json::to_string(&Tier::AboveHighest).unwrap_or_default();
        assert_eq!(json, "\"above-highest\"");
        let tier: Tier = serde_json::from_str("\"below-low\"").unwrap_or(Tier::Above);
        assert_eq!(tier, Tier::BelowLow);
        assert_eq!(Tier::BelowLow.to_string(), "below-low");
    }
}
