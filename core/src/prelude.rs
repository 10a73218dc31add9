use serde::{Deserialize, Serialize};

/// User-facing display preferences consumed by the redraw logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub hide_good_auto_assessments: bool,
    pub hide_poor_assessment_visual: bool,
    pub hide_oc_assessment_visual: bool,
    pub show_scenario_support: bool,
    pub prioritize_oc_assessment: bool,
    pub show_oc_only: bool,
    pub mil_symbol_scale: f64,
    pub show_team_org_name: bool,
    pub mute_poor_assessment_sound: bool,
    pub mute_good_assessment_sound: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            hide_good_auto_assessments: false,
            hide_poor_assessment_visual: false,
            hide_oc_assessment_visual: false,
            show_scenario_support: false,
            prioritize_oc_assessment: false,
            show_oc_only: false,
            mil_symbol_scale: 1.0,
            show_team_org_name: true,
            mute_poor_assessment_sound: false,
            mute_good_assessment_sound: false,
        }
    }
}

/// Graded evaluation attached to a task, concept or team role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentLevel {
    #[default]
    Unknown,
    BelowExpectation,
    AtExpectation,
    AboveExpectation,
}

impl AssessmentLevel {
    pub fn is_poor_performing(self) -> bool {
        matches!(self, AssessmentLevel::BelowExpectation)
    }

    pub fn is_good_performing(self) -> bool {
        matches!(
            self,
            AssessmentLevel::AtExpectation | AssessmentLevel::AboveExpectation
        )
    }

    /// Rank used when several assessments compete for one role. Higher is worse.
    pub(crate) fn severity(self) -> u8 {
        match self {
            AssessmentLevel::Unknown => 0,
            AssessmentLevel::AboveExpectation => 1,
            AssessmentLevel::AtExpectation => 2,
            AssessmentLevel::BelowExpectation => 3,
        }
    }
}

/// Lifecycle of a performance node within a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceNodeState {
    #[default]
    Unactivated,
    Active,
    Finished,
    Deactivated,
}

/// Common error type for the dashboard core.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("entity from session {entity_session} cannot join the layer for session {layer_session}")]
    LayerMismatch {
        entity_session: u32,
        layer_session: u32,
    },
    #[error("listener failure: {0}")]
    Listener(String),
    #[error("payload decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
