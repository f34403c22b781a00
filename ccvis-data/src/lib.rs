//! Core data types for ccvis maps.
//!
//! - `record`: header-addressed point rows parsed from CSV
//! - `color`: RGBA colours and category palettes
//! - `loader`: fetch + parse with cancellation and graceful degradation

pub mod color;
pub mod loader;
pub mod record;

pub use color::{CategoryPalette, Rgba, FEMALE_COLOR, MALE_COLOR, NEUTRAL_GRAY};
pub use loader::{load_points, CancellationToken, Fetch, LoadError, LoadOutcome};
pub use record::{parse_points, PointRecord, PointSet};
