pub mod entity;
pub mod performance;

pub use entity::{
    DamageState, DetonationResult, DetonationUpdate, EntityIdentifier, EntityStateUpdate,
    EntityType, LearnerInfo, Location, Orientation, Posture, RemoveEntityMessage,
    SessionEntityIdentifier, Velocity,
};
pub use performance::{
    ConceptPerformanceState, KnowledgeSessionState, PerformanceState, PerformanceStateAttribute,
    TaskPerformanceState, TeamNode,
};
