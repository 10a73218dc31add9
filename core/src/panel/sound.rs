use serde::{Deserialize, Serialize};

/// Alert cue requested by a redraw. Declaration order is priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentSoundType {
    #[default]
    None,
    GoodAssessment,
    PoorAssessment,
}

impl AssessmentSoundType {
    pub fn is_higher_priority(self, other: AssessmentSoundType) -> bool {
        self > other
    }

    /// Keeps whichever of the two requests outranks the other.
    pub fn combine(self, other: AssessmentSoundType) -> AssessmentSoundType {
        self.max(other)
    }

    pub fn is_none(self) -> bool {
        self == AssessmentSoundType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AssessmentSoundType::*;

    #[test]
    fn poor_outranks_good_outranks_silence() {
        assert!(PoorAssessment.is_higher_priority(GoodAssessment));
        assert!(GoodAssessment.is_higher_priority(None));
        assert!(!GoodAssessment.is_higher_priority(PoorAssessment));
        assert_eq!(GoodAssessment.combine(PoorAssessment), PoorAssessment);
        assert_eq!(PoorAssessment.combine(GoodAssessment), PoorAssessment);
        assert_eq!(None.combine(None), None);
    }
}
