//! Year → horizontal position mapping.

use lanemark_protocol::Breakpoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("a year scale needs at least one breakpoint")]
    Empty,
    #[error("breakpoint {index} is not a finite (year, pos) pair")]
    NotFinite { index: usize },
    #[error("breakpoint years must be strictly ascending ({prev} then {next})")]
    YearsNotAscending { prev: f64, next: f64 },
    #[error("breakpoint positions must not decrease ({prev}% then {next}%)")]
    PositionsDecrease { prev: f64, next: f64 },
}

/// Anything that maps a year to a percentage (0–100) of the lane width.
///
/// Must be pure and non-decreasing in `year` for the left-to-right layout
/// order to make sense.
pub trait YearPosition {
    fn percent_for_year(&self, year: f64) -> f64;
}

impl<F> YearPosition for F
where
    F: Fn(f64) -> f64,
{
    fn percent_for_year(&self, year: f64) -> f64 {
        self(year)
    }
}

/// Piecewise-linear year axis through a fixed set of breakpoints.
///
/// Years before the first breakpoint map to its position, years after the
/// last map to the last position.
#[derive(Debug, Clone, PartialEq)]
pub struct YearScale {
    breakpoints: Vec<Breakpoint>,
}

impl YearScale {
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, ScaleError> {
        if breakpoints.is_empty() {
            return Err(ScaleError::Empty);
        }
        for (index, bp) in breakpoints.iter().enumerate() {
            if !bp.year.is_finite() || !bp.pos.is_finite() {
                return Err(ScaleError::NotFinite { index });
            }
        }
        for pair in breakpoints.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.year <= a.year {
                return Err(ScaleError::YearsNotAscending {
                    prev: a.year,
                    next: b.year,
                });
            }
            if b.pos < a.pos {
                return Err(ScaleError::PositionsDecrease {
                    prev: a.pos,
                    next: b.pos,
                });
            }
        }
        Ok(Self { breakpoints })
    }

    /// Two-point scale spreading `[first_year, last_year]` over the full width.
    pub fn uniform(first_year: f64, last_year: f64) -> Result<Self, ScaleError> {
        if first_year == last_year {
            return Self::new(vec![Breakpoint::new(first_year, 0.0)]);
        }
        Self::new(vec![
            Breakpoint::new(first_year, 0.0),
            Breakpoint::new(last_year, 100.0),
        ])
    }

    /// The year-axis spots, in ascending year order.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }
}

impl YearPosition for YearScale {
    fn percent_for_year(&self, year: f64) -> f64 {
        let first = &self.breakpoints[0];
        let last = &self.breakpoints[self.breakpoints.len() - 1];
        if year <= first.year {
            return first.pos;
        }
        if year >= last.year {
            return last.pos;
        }

        // First breakpoint strictly after `year`; its predecessor is at or before it.
        let upper = self.breakpoints.partition_point(|bp| bp.year <= year);
        let lo = &self.breakpoints[upper - 1];
        let hi = &self.breakpoints[upper];
        let ratio = (year - lo.year) / (hi.year - lo.year);
        lo.pos + ratio * (hi.pos - lo.pos)
    }
}
