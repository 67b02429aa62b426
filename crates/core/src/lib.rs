//! Timeline label placement.
//!
//! Entries of a lane sit on a horizontal axis at fixed x-positions; the
//! engine gives each one's two-line label a tier above or below the axis and
//! a horizontal shift so that no two labels in the lane collide.

pub mod catalog;
pub mod config;
pub mod layout;
pub mod model;
pub mod scale;

pub use catalog::{Catalog, CatalogError, parse_catalog};
pub use config::{ConfigError, LayoutConfig, TierNeeds};
pub use layout::LayoutEngine;
pub use layout::candidates::{Candidate, CandidateRanking};
pub use layout::footprint::{FootprintEstimator, citation};
pub use model::{Lane, LaneKey, TimelineLayout, layout_timeline};
pub use scale::{ScaleError, YearPosition, YearScale};
