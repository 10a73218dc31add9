use crate::generator::profile::{build_scenario_from_config, Scenario, ScenarioEvent};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use gmcore::map::{
    EntityStatusListener, HeadlessSurface, SessionsMap, ShapeFactory, StatusChange,
    SymbolUrlGenerator,
};
use gmcore::messages::KnowledgeSessionState;
use gmcore::panel::{AssessmentSoundType, PriorityPanel, RedrawContext, TaskDataView, ViewLayout};
use gmcore::prelude::DashboardResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

const PRIORITY_ATTENTION: u8 = 2;
const PRIORITY_WARNING: u8 = 1;
const PRIORITY_INFO: u8 = 0;

/// Entry in the observer's notification feed. Higher `priority` sorts first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub at_ms: u64,
    pub priority: u8,
    pub session_id: u32,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowResult {
    pub scenario: String,
    pub events_applied: usize,
    pub rejected_updates: usize,
    pub entities_on_map: usize,
    pub entities_timed_out: usize,
    pub detonations_drawn: usize,
    pub detonations_expired: usize,
    pub status_changes: usize,
    pub alert_count: i64,
    pub alert_badge: Option<String>,
    pub alert_roles: BTreeMap<u32, Vec<String>>,
    pub poor_sounds: usize,
    pub good_sounds: usize,
    pub pulses: usize,
    pub rendered_points: usize,
    /// Display order of the first task's concepts.
    pub concept_order: Vec<u32>,
    pub notifications: Vec<String>,
    pub pending_notifications: usize,
    pub elapsed_ms: u64,
}

struct StatusRecorder {
    changes: Arc<Mutex<Vec<StatusChange>>>,
}

impl EntityStatusListener for StatusRecorder {
    fn entity_status_changed(&mut self, change: &StatusChange) -> DashboardResult<()> {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change.clone());
        Ok(())
    }
}

fn notification_feed() -> PriorityPanel<Notification, String> {
    PriorityPanel::new(
        Box::new(|note: &Notification| format!("[{} ms] session {}: {}", note.at_ms, note.session_id, note.message)),
        Box::new(|a: &Notification, b: &Notification| b.priority.cmp(&a.priority)),
    )
}

/// Mutable state of one replay on the virtual clock.
struct Playback<'a> {
    config: &'a WorkflowConfig,
    map: SessionsMap,
    views: BTreeMap<(u32, u32), TaskDataView>,
    feed: PriorityPanel<Notification, String>,
    changes: Arc<Mutex<Vec<StatusChange>>>,
    paused: bool,
    now_ms: u64,
    result: WorkflowResult,
}

impl<'a> Playback<'a> {
    fn notify(&mut self, priority: u8, session_id: u32, message: String) {
        self.feed.add(Notification {
            at_ms: self.now_ms,
            priority,
            session_id,
            message,
        });
    }

    /// Polls the map timers on every tick up to `target_ms`.
    fn advance_to(&mut self, target_ms: u64) {
        let tick = self.config.tick();
        while self.now_ms + tick <= target_ms {
            self.now_ms += tick;
            let report = self.map.poll(self.now_ms, self.paused);
            self.result.detonations_expired += report.expired_detonations;
            self.result.entities_timed_out += report.removed.len();
            for removed in report.removed {
                let who = removed.role.unwrap_or_else(|| removed.id.to_string());
                self.notify(
                    PRIORITY_WARNING,
                    removed.id.host_domain_session_id,
                    format!("{} stopped reporting", who),
                );
            }
        }
        self.now_ms = self.now_ms.max(target_ms);
    }

    fn apply(&mut self, event: &ScenarioEvent) {
        match event {
            ScenarioEvent::Entity(update) => {
                if let Err(err) = self.map.entity_location_update(update.clone(), self.now_ms) {
                    log::warn!("rejected update for {}: {}", update.session_entity_id, err);
                    self.result.rejected_updates += 1;
                }
            }
            ScenarioEvent::Remove(message) => {
                self.map.remove_entity_request(message);
            }
            ScenarioEvent::Detonation(update) => {
                self.map.detonation_update(update, self.now_ms);
                self.result.detonations_drawn += 1;
            }
            ScenarioEvent::SessionState { session_id, state } => {
                self.map.session_state_update(*session_id, state, self.now_ms);
                self.update_views(*session_id, state);
            }
            ScenarioEvent::Select { session_id, roles } => {
                self.map.entity_selected(*session_id, roles);
            }
            ScenarioEvent::Pause => {
                self.paused = true;
                self.feed.set_live_mode(false);
            }
            ScenarioEvent::Resume => {
                self.paused = false;
                self.feed.set_live_mode(true);
            }
        }
        self.drain_status_changes();
        self.result.events_applied += 1;
    }

    fn update_views(&mut self, session_id: u32, state: &KnowledgeSessionState) {
        let Some(performance) = &state.performance else {
            return;
        };
        let mut ctx = RedrawContext::new(self.map.settings()).in_playback(self.config.playback);
        if let Some(user) = self.config.user_name.as_deref() {
            ctx = ctx.with_user(user);
        }

        let mut sounds = Vec::new();
        for (task_id, task) in &performance.tasks {
            let view = self
                .views
                .entry((session_id, *task_id))
                .or_insert_with(|| TaskDataView::new(ViewLayout::List));
            let sound = view.update_state(task.clone(), &ctx);
            if !sound.is_none() {
                sounds.push((sound, task.state.name.clone()));
            }
        }

        for (sound, task) in sounds {
            match sound {
                AssessmentSoundType::PoorAssessment => {
                    self.result.poor_sounds += 1;
                    self.notify(PRIORITY_ATTENTION, session_id, format!("poor assessment in {}", task));
                }
                AssessmentSoundType::GoodAssessment => {
                    self.result.good_sounds += 1;
                    self.notify(PRIORITY_INFO, session_id, format!("good assessment in {}", task));
                }
                AssessmentSoundType::None => {}
            }
        }
    }

    fn drain_status_changes(&mut self) {
        let drained: Vec<StatusChange> = std::mem::take(
            &mut *self.changes.lock().unwrap_or_else(PoisonError::into_inner),
        );
        self.result.status_changes += drained.len();
        for change in drained {
            if !change.current.needs_attention() {
                continue;
            }
            let who = change.role.unwrap_or_else(|| "unassigned entity".to_string());
            self.notify(PRIORITY_ATTENTION, change.session_id, format!("{} needs attention", who));
        }
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// The scripted scenario if one is configured, else a generated one.
    pub fn scenario(&self) -> anyhow::Result<Scenario> {
        match &self.config.scenario {
            Some(path) => Scenario::load(path),
            None => build_scenario_from_config(&self.config.generator)
                .context("generating synthetic scenario"),
        }
    }

    pub fn execute(&self, scenario: &Scenario) -> anyhow::Result<WorkflowResult> {
        let main = HeadlessSurface::new("main");
        let probe = main.probe();
        let factory = ShapeFactory::new(Box::new(main), Box::new(HeadlessSurface::new("minimap")));
        let symbols = SymbolUrlGenerator::new(&self.config.symbol_base);
        let mut map = SessionsMap::new(factory, symbols, self.config.settings.clone());

        let changes = Arc::new(Mutex::new(Vec::new()));
        map.add_status_listener(Box::new(StatusRecorder {
            changes: Arc::clone(&changes),
        }));

        let end_ms = scenario
            .duration_ms()
            .checked_add(self.config.settle_ms)
            .context("overflow computing scenario end time")?;

        let mut playback = Playback {
            config: &self.config,
            map,
            views: BTreeMap::new(),
            feed: notification_feed(),
            changes,
            paused: false,
            now_ms: 0,
            result: WorkflowResult {
                scenario: scenario.name.clone(),
                ..WorkflowResult::default()
            },
        };
        for timed in scenario.timeline() {
            playback.advance_to(timed.at_ms);
            playback.apply(&timed.event);
        }
        playback.advance_to(end_ms);

        let Playback {
            map,
            views,
            feed,
            now_ms,
            mut result,
            ..
        } = playback;
        result.entities_on_map = map.map_entity_count();
        result.alert_count = map.alerts().count();
        result.alert_badge = map.alerts().badge();
        result.alert_roles = map.alert_entity_roles();
        result.pulses = probe.total_pulses();
        result.rendered_points = probe.rendered_point_count();
        result.concept_order = views
            .values()
            .next()
            .map(|view| view.concepts().node_ids())
            .unwrap_or_default();
        result.notifications = feed.widget_items().cloned().collect();
        result.pending_notifications = feed.pending_count();
        result.elapsed_ms = now_ms;
        log::info!(
            "scenario {} replayed: {} events, {} entities on map",
            result.scenario,
            result.events_applied,
            result.entities_on_map
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::TimedEvent;
    use gmcore::messages::{
        ConceptPerformanceState, EntityStateUpdate, EntityType, Location, PerformanceState,
        PerformanceStateAttribute, SessionEntityIdentifier, TaskPerformanceState, TeamNode,
    };
    use gmcore::prelude::AssessmentLevel;

    fn alpha() -> EntityStateUpdate {
        let ground = EntityType {
            kind: 1,
            domain: 1,
            country: 225,
            category: 3,
            subcategory: 0,
            specific: 0,
        };
        EntityStateUpdate::new(
            SessionEntityIdentifier::new(1, 1, 1, 1),
            Location::new(35.0, -116.0, 0.0),
            1,
            ground,
        )
        .with_role("Alpha")
    }

    fn assessment(level: AssessmentLevel, timestamp: u64) -> ScenarioEvent {
        let mut attribute = PerformanceStateAttribute::new(10, "Alpha holds position", level);
        attribute.short_term_timestamp = timestamp;
        attribute
            .assessed_team_org_entities
            .insert("Alpha".into(), Some(level));
        let mut performance = PerformanceState::default();
        performance.tasks.insert(
            1,
            TaskPerformanceState::new(
                PerformanceStateAttribute::new(1, "Hold", AssessmentLevel::Unknown),
                vec![ConceptPerformanceState::leaf(attribute)],
            ),
        );
        ScenarioEvent::SessionState {
            session_id: 1,
            state: KnowledgeSessionState {
                performance: Some(performance),
                team: Some(TeamNode::team("Squad", vec![TeamNode::role("Alpha")])),
            },
        }
    }

    fn at(at_ms: u64, event: ScenarioEvent) -> TimedEvent {
        TimedEvent { at_ms, event }
    }

    #[test]
    fn runner_replays_generated_session() {
        let runner = Runner::new(WorkflowConfig::from_args(6, 60, 3));
        let scenario = runner.scenario().unwrap();
        let result = runner.execute(&scenario).unwrap();
        assert_eq!(result.rejected_updates, 0);
        assert_eq!(result.entities_timed_out, 1);
        assert_eq!(result.entities_on_map, 5);
        assert_eq!(result.detonations_drawn, 4);
        assert_eq!(result.detonations_expired, 4);
        assert_eq!(result.events_applied, scenario.events.len());
        assert_eq!(result.pending_notifications, 0);
        assert!(result.elapsed_ms >= scenario.duration_ms());
    }

    #[test]
    fn paused_feed_holds_notifications_until_resumed() {
        let runner = Runner::new(WorkflowConfig::from_args(1, 1, 0));
        let mut scenario = Scenario {
            name: "drill".into(),
            events: vec![
                at(0, ScenarioEvent::Entity(alpha())),
                at(0, assessment(AssessmentLevel::Unknown, 0)),
                at(100, ScenarioEvent::Pause),
                at(200, assessment(AssessmentLevel::BelowExpectation, 200)),
            ],
        };
        let paused = runner.execute(&scenario).unwrap();
        assert_eq!(paused.poor_sounds, 1);
        assert!(paused.notifications.is_empty());
        assert_eq!(paused.pending_notifications, 2);
        assert_eq!(paused.alert_count, 1);
        assert_eq!(paused.alert_roles[&1], vec!["Alpha".to_string()]);

        scenario.events.push(at(300, ScenarioEvent::Resume));
        let resumed = runner.execute(&scenario).unwrap();
        assert_eq!(resumed.pending_notifications, 0);
        assert_eq!(resumed.notifications.len(), 2);
        assert!(resumed.notifications.iter().all(|note| note.starts_with("[200 ms]")));
    }

    #[test]
    fn rejected_updates_are_counted_not_fatal() {
        let runner = Runner::new(WorkflowConfig::from_args(1, 1, 0));
        let mut broken = alpha();
        broken.location = None;
        let scenario = Scenario {
            name: "broken".into(),
            events: vec![at(0, ScenarioEvent::Entity(broken)), at(0, ScenarioEvent::Entity(alpha()))],
        };
        let result = runner.execute(&scenario).unwrap();
        assert_eq!(result.rejected_updates, 1);
        assert_eq!(result.entities_on_map, 1);
        assert_eq!(result.events_applied, 2);
    }

    #[test]
    fn own_assessments_stay_silent() {
        let mut config = WorkflowConfig::from_args(1, 1, 0);
        config.user_name = Some("observer".into());
        let runner = Runner::new(config);
        let mut assessed = assessment(AssessmentLevel::BelowExpectation, 200);
        if let ScenarioEvent::SessionState { state, .. } = &mut assessed {
            if let Some(performance) = state.performance.as_mut() {
                for task in performance.tasks.values_mut() {
                    for concept in &mut task.concepts {
                        concept.state.evaluator = Some("Observer".into());
                    }
                }
            }
        }
        let scenario = Scenario {
            name: "self".into(),
            events: vec![at(0, assessment(AssessmentLevel::Unknown, 0)), at(200, assessed)],
        };
        let result = runner.execute(&scenario).unwrap();
        assert_eq!(result.poor_sounds, 0);
        assert_eq!(result.status_changes, 2);
    }
}
