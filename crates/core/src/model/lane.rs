use lanemark_protocol::{Entry, SharedStr};
use serde::{Deserialize, Serialize};

/// Largest fractional offset step used to separate same-year entries.
pub const YEAR_OFFSET_STEP: f64 = 0.3;

/// Identifies a lane: one sub-track inside a broad track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneKey {
    pub track: SharedStr,
    pub sub_track: SharedStr,
}

impl LaneKey {
    pub fn new(track: impl Into<SharedStr>, sub_track: impl Into<SharedStr>) -> Self {
        Self {
            track: track.into(),
            sub_track: sub_track.into(),
        }
    }

    /// Parse the `"Track::Sub track"` form produced by `Display`.
    pub fn parse(key: &str) -> Option<Self> {
        let (track, sub_track) = key.split_once("::")?;
        Some(Self::new(track, sub_track))
    }
}

impl std::fmt::Display for LaneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.track, self.sub_track)
    }
}

/// A horizontal row of the timeline and the entries drawn in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub key: LaneKey,
    pub entries: Vec<Entry>,
}

impl Lane {
    pub fn new(key: LaneKey) -> Self {
        Self {
            key,
            entries: Vec::new(),
        }
    }
}

/// Offsets closer than this to an existing year count as the same year.
const SAME_YEAR_TOLERANCE: f64 = 1e-9;

/// Spread entries that share an exact year so their dots don't coincide.
///
/// Within a group of `n` entries sharing a year, the first (input order)
/// keeps it and the rest get successive multiples of
/// `step = min(YEAR_OFFSET_STEP, 1 / n)` added. A multiple that lands on a
/// year some other entry already has is skipped, so every resulting year is
/// distinct. Entries with a unique year are untouched.
pub fn disambiguate_years(entries: &mut [Entry]) {
    let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match groups.iter_mut().find(|(year, _)| *year == entry.year) {
            Some((_, members)) => members.push(index),
            None => groups.push((entry.year, vec![index])),
        }
    }

    let mut taken: Vec<f64> = groups.iter().map(|(year, _)| *year).collect();
    for (year, members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
        let step = YEAR_OFFSET_STEP.min(1.0 / members.len() as f64);
        let mut k = 0u32;
        for index in members.into_iter().skip(1) {
            let offset_year = loop {
                k += 1;
                let candidate = year + f64::from(k) * step;
                if !taken
                    .iter()
                    .any(|&t| (t - candidate).abs() < SAME_YEAR_TOLERANCE)
                {
                    break candidate;
                }
            };
            taken.push(offset_year);
            entries[index].year = offset_year;
        }
    }
}
