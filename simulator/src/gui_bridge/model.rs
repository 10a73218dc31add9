use crate::workflow::runner::WorkflowResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot served to dashboard clients.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashboardModel {
    pub scenario: String,
    pub entities_on_map: usize,
    pub alert_badge: Option<String>,
    pub alert_roles: BTreeMap<u32, Vec<String>>,
    pub poor_sounds: usize,
    pub good_sounds: usize,
    pub detonations: usize,
    pub concept_order: Vec<u32>,
    pub notifications: Vec<String>,
    pub pending_notifications: usize,
}

impl DashboardModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        Self {
            scenario: result.scenario.clone(),
            entities_on_map: result.entities_on_map,
            alert_badge: result.alert_badge.clone(),
            alert_roles: result.alert_roles.clone(),
            poor_sounds: result.poor_sounds,
            good_sounds: result.good_sounds,
            detonations: result.detonations_drawn,
            concept_order: result.concept_order.clone(),
            notifications: result.notifications.clone(),
            pending_notifications: result.pending_notifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_copies_the_replay_summary() {
        let result = WorkflowResult {
            scenario: "drill".into(),
            entities_on_map: 2,
            alert_badge: Some("1".into()),
            detonations_drawn: 3,
            ..WorkflowResult::default()
        };
        let model = DashboardModel::from_result(&result);
        assert_eq!(model.scenario, "drill");
        assert_eq!(model.alert_badge.as_deref(), Some("1"));
        assert_eq!(model.detonations, 3);
        assert!(model.notifications.is_empty());
    }
}
