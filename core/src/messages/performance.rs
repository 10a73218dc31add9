use crate::prelude::{AssessmentLevel, DashboardResult, PerformanceNodeState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Assessment attributes shared by task and concept nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStateAttribute {
    pub node_id: u32,
    pub name: String,
    #[serde(default)]
    pub short_term: AssessmentLevel,
    #[serde(default)]
    pub short_term_timestamp: u64,
    #[serde(default)]
    pub node_state: PerformanceNodeState,
    #[serde(default)]
    pub evaluator: Option<String>,
    #[serde(default)]
    pub scenario_support: bool,
    /// Team roles assessed by this node. A `None` value marks a visual-only state.
    #[serde(default)]
    pub assessed_team_org_entities: BTreeMap<String, Option<AssessmentLevel>>,
    #[serde(default)]
    pub assessment_explanation: Option<Vec<String>>,
    #[serde(default)]
    pub observer_media: Option<String>,
}

impl PerformanceStateAttribute {
    pub fn new(node_id: u32, name: &str, short_term: AssessmentLevel) -> Self {
        Self {
            node_id,
            name: name.to_string(),
            short_term,
            short_term_timestamp: 0,
            node_state: PerformanceNodeState::Active,
            evaluator: None,
            scenario_support: false,
            assessed_team_org_entities: BTreeMap::new(),
            assessment_explanation: None,
            observer_media: None,
        }
    }

    pub fn is_unactivated(&self) -> bool {
        self.node_state == PerformanceNodeState::Unactivated
    }
}

/// A concept node. Intermediate concepts carry their children in `concepts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptPerformanceState {
    pub state: PerformanceStateAttribute,
    #[serde(default)]
    pub contains_observed_assessment_condition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<ConceptPerformanceState>>,
}

impl ConceptPerformanceState {
    pub fn leaf(state: PerformanceStateAttribute) -> Self {
        Self {
            state,
            contains_observed_assessment_condition: false,
            concepts: None,
        }
    }

    pub fn intermediate(state: PerformanceStateAttribute, concepts: Vec<ConceptPerformanceState>) -> Self {
        Self {
            state,
            contains_observed_assessment_condition: false,
            concepts: Some(concepts),
        }
    }

    pub fn observed(mut self) -> Self {
        self.contains_observed_assessment_condition = true;
        self
    }

    pub fn node_id(&self) -> u32 {
        self.state.node_id
    }

    pub fn is_intermediate(&self) -> bool {
        self.concepts.is_some()
    }

    pub fn children(&self) -> &[ConceptPerformanceState] {
        self.concepts.as_deref().unwrap_or(&[])
    }

    /// Appends every leaf concept beneath (or equal to) this node, in tree order.
    pub fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a ConceptPerformanceState>) {
        match &self.concepts {
            Some(children) => children.iter().for_each(|child| child.collect_leaves(leaves)),
            None => leaves.push(self),
        }
    }

    /// Visits this node and every descendant.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a ConceptPerformanceState)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPerformanceState {
    pub state: PerformanceStateAttribute,
    #[serde(default)]
    pub contains_observed_assessment_condition: bool,
    #[serde(default)]
    pub concepts: Vec<ConceptPerformanceState>,
}

impl TaskPerformanceState {
    pub fn new(state: PerformanceStateAttribute, concepts: Vec<ConceptPerformanceState>) -> Self {
        let contains_observed_assessment_condition = concepts
            .iter()
            .any(|concept| concept.contains_observed_assessment_condition);
        Self {
            state,
            contains_observed_assessment_condition,
            concepts,
        }
    }

    /// Leaf concepts of the whole task with intermediate concepts flattened away.
    pub fn leaf_concepts(&self) -> Vec<&ConceptPerformanceState> {
        let mut leaves = Vec::new();
        for concept in &self.concepts {
            concept.collect_leaves(&mut leaves);
        }
        leaves
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceState {
    #[serde(default)]
    pub tasks: BTreeMap<u32, TaskPerformanceState>,
}

/// Named team organization; leaves are individual roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamNode {
    pub name: String,
    #[serde(default)]
    pub members: Vec<TeamNode>,
}

impl TeamNode {
    pub fn role(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    pub fn team(name: &str, members: Vec<TeamNode>) -> Self {
        Self {
            name: name.to_string(),
            members,
        }
    }

    pub fn is_role(&self) -> bool {
        self.members.is_empty()
    }
}

/// Snapshot of a knowledge session's learner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KnowledgeSessionState {
    #[serde(default)]
    pub performance: Option<PerformanceState>,
    #[serde(default)]
    pub team: Option<TeamNode>,
}

impl KnowledgeSessionState {
    pub fn from_json(payload: &str) -> DashboardResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Visual-only states carry concepts whose assessed roles have no assessment value.
    pub fn is_visual_only(&self) -> bool {
        let Some(performance) = &self.performance else {
            return false;
        };
        performance.tasks.values().any(|task| {
            task.concepts.iter().any(|concept| {
                concept
                    .state
                    .assessed_team_org_entities
                    .values()
                    .any(Option::is_none)
            })
        })
    }
}
