pub mod ordering;
pub mod performance;
pub mod priority;
pub mod sound;

pub use ordering::{NodePrioritizer, ObservedAssessmentFirst, PrioritizedNode};
pub use performance::{
    ConceptItem, ConceptList, MoveStats, NodeHighlights, RedrawContext, TaskDataView, ViewLayout,
};
pub use priority::{ItemComparator, PriorityPanel, WidgetBuilder};
pub use sound::AssessmentSoundType;
