//! Session-state synchronization core for the Game Master dashboard.
//!
//! Entity updates and learner state from live or replayed knowledge sessions
//! are folded into per-session map layers, alert counts and incrementally
//! redrawn performance panels. Rendering goes through the `MapSurface` seam
//! so the same logic drives a browser map or the headless recorder.

pub mod map;
pub mod math;
pub mod messages;
pub mod panel;
pub mod prelude;
pub mod telemetry;

pub use map::{SessionsMap, ShapeFactory, SymbolUrlGenerator};
pub use panel::{AssessmentSoundType, PriorityPanel, TaskDataView};
pub use prelude::{AssessmentLevel, DashboardError, DashboardResult, DisplaySettings};
