use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// A dated record to be drawn as a dot with a two-line label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within its lane.
    pub id: SharedStr,
    /// Publication year. May carry a fractional offset that separates
    /// entries sharing a year within the same lane.
    pub year: f64,
    /// First label line.
    pub title: SharedStr,
    /// `"Surname, Given; Surname, Given; ..."`
    #[serde(default)]
    pub authors: SharedStr,
}

impl Entry {
    pub fn new(
        id: impl Into<SharedStr>,
        year: f64,
        title: impl Into<SharedStr>,
        authors: impl Into<SharedStr>,
    ) -> Self {
        Self {
            id: id.into(),
            year,
            title: title.into(),
            authors: authors.into(),
        }
    }
}

/// A known point of the year axis: `year` sits at `pos` percent of the lane width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub year: f64,
    pub pos: f64,
    /// Header text shown at this point (e.g. `"24"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<SharedStr>,
}

impl Breakpoint {
    pub fn new(year: f64, pos: f64) -> Self {
        Self {
            year,
            pos,
            label: None,
        }
    }
}
