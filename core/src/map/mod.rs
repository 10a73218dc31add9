pub mod assessment;
pub mod data_point;
pub mod entity;
pub mod headless;
pub mod layer;
pub mod liveness;
pub mod render;
pub mod role_index;
pub mod sessions;
pub mod shape;
pub mod symbol;

pub use assessment::{TeamAssessmentEvaluator, WorstConceptEvaluator};
pub use data_point::{DrawContext, MapDataPoint, MappableData, Selection};
pub use entity::{EntityDataPoint, RoleChange, StatusChange};
pub use headless::{HeadlessSurface, SurfaceProbe};
pub use layer::{EntityUpdateOutcome, RemovedEntity, SessionMapLayer};
pub use liveness::{DetonationPhase, DetonationTimer, LivenessTimer};
pub use render::{ClickTarget, LineHandle, MapSurface, PointHandle, VisualAttributes};
pub use role_index::RoleIndex;
pub use sessions::{EntityStatusListener, PollReport, SelectedItem, SessionsMap, ViewRequest};
pub use shape::{MapShape, ShapeFactory, ShapeIdAllocator};
pub use symbol::{Affiliation, MilitarySymbol, Sidc, SymbolStatus, SymbolUrlGenerator};
