pub mod lane;
pub mod timeline;

pub use lane::{Lane, LaneKey, YEAR_OFFSET_STEP, disambiguate_years};
pub use timeline::{LaneResult, TimelineLayout, layout_timeline};
