use crate::messages::{KnowledgeSessionState, PerformanceStateAttribute, TeamNode};
use crate::prelude::AssessmentLevel;
use std::collections::BTreeMap;

/// Derives per-role assessments from a knowledge session snapshot.
pub trait TeamAssessmentEvaluator: Send {
    fn evaluate(&self, state: &KnowledgeSessionState) -> BTreeMap<String, AssessmentLevel>;
}

/// Each role takes the worst assessment among activated nodes assessing it.
/// Team-level assessments flow down to member roles lacking a direct one.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorstConceptEvaluator;

fn record(worst: &mut BTreeMap<String, AssessmentLevel>, attribute: &PerformanceStateAttribute) {
    if attribute.is_unactivated() {
        return;
    }
    for (role, level) in &attribute.assessed_team_org_entities {
        let Some(level) = level else {
            continue;
        };
        worst
            .entry(role.clone())
            .and_modify(|current| {
                if level.severity() > current.severity() {
                    *current = *level;
                }
            })
            .or_insert(*level);
    }
}

fn propagate(
    node: &TeamNode,
    inherited: Option<AssessmentLevel>,
    direct: &BTreeMap<String, AssessmentLevel>,
    out: &mut BTreeMap<String, AssessmentLevel>,
) {
    let own = direct.get(&node.name).copied().or(inherited);
    if node.is_role() {
        if let Some(level) = own {
            out.entry(node.name.clone()).or_insert(level);
        }
        return;
    }
    for member in &node.members {
        propagate(member, own, direct, out);
    }
}

impl TeamAssessmentEvaluator for WorstConceptEvaluator {
    fn evaluate(&self, state: &KnowledgeSessionState) -> BTreeMap<String, AssessmentLevel> {
        let mut direct = BTreeMap::new();
        if let Some(performance) = &state.performance {
            for task in performance.tasks.values() {
                record(&mut direct, &task.state);
                for concept in &task.concepts {
                    concept.walk(&mut |node| record(&mut direct, &node.state));
                }
            }
        }

        let mut assessments = direct.clone();
        if let Some(team) = &state.team {
            propagate(team, None, &direct, &mut assessments);
        }
        assessments
    }
}
