pub mod entry;
pub mod layout;
pub mod shared_str;
pub mod tier;

pub use entry::{Breakpoint, Entry};
pub use layout::{LabelPlacement, LaneLayout, LayoutDiagnostics, Resolution, Span};
pub use shared_str::SharedStr;
pub use tier::{Side, Tier};
