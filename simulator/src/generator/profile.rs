use crate::generator::template::{concept_name, role_name};
use anyhow::Context;
use gmcore::messages::{
    ConceptPerformanceState, DetonationResult, DetonationUpdate, EntityStateUpdate, EntityType,
    KnowledgeSessionState, Location, PerformanceState, PerformanceStateAttribute,
    RemoveEntityMessage, SessionEntityIdentifier, TaskPerformanceState, TeamNode,
};
use gmcore::prelude::AssessmentLevel;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest per-step drift of a generated entity, in degrees.
const STEP_DEGREES: f64 = 0.0004;
const TASK_ID: u32 = 1;
const MOVEMENT_CONCEPT_ID: u32 = 2;
const FIRST_ROLE_CONCEPT_ID: u32 = 10;

const LEVELS: [AssessmentLevel; 4] = [
    AssessmentLevel::Unknown,
    AssessmentLevel::BelowExpectation,
    AssessmentLevel::AtExpectation,
    AssessmentLevel::AboveExpectation,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Entity(EntityStateUpdate),
    Remove(RemoveEntityMessage),
    Detonation(DetonationUpdate),
    SessionState {
        session_id: u32,
        state: KnowledgeSessionState,
    },
    Select {
        session_id: u32,
        roles: Vec<String>,
    },
    Pause,
    Resume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: ScenarioEvent,
}

/// A scripted or generated session timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        Ok(scenario)
    }

    pub fn duration_ms(&self) -> u64 {
        self.events.iter().map(|event| event.at_ms).max().unwrap_or(0)
    }

    /// Events in timeline order; events sharing a timestamp keep file order.
    pub fn timeline(&self) -> Vec<&TimedEvent> {
        let mut ordered: Vec<&TimedEvent> = self.events.iter().collect();
        ordered.sort_by_key(|event| event.at_ms);
        ordered
    }
}

/// Configuration for generating a synthetic session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub entities: usize,
    pub steps: usize,
    pub step_ms: u64,
    pub seed: u64,
    pub session_id: u32,
    pub origin: Location,
    pub assessment_every: usize,
    pub detonation_every: usize,
    /// Step from which the last entity stops reporting.
    pub silent_after: Option<usize>,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            entities: 6,
            steps: 60,
            step_ms: 1_000,
            seed: 0,
            session_id: 1,
            origin: Location::new(35.2704, -116.6843, 0.0),
            assessment_every: 5,
            detonation_every: 12,
            silent_after: Some(20),
            description: None,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    fn normalized_entities(&self) -> usize {
        self.entities.max(1)
    }

    fn normalized_steps(&self) -> usize {
        self.steps.max(1)
    }

    fn go_silent(&self, index: usize, step: usize) -> bool {
        index + 1 == self.normalized_entities()
            && self.silent_after.map_or(false, |after| step >= after)
    }
}

fn force_for(index: usize) -> u8 {
    if index % 2 == 0 {
        1
    } else {
        2
    }
}

fn entity_update(
    config: &GeneratorConfig,
    index: usize,
    role: &str,
    location: Location,
) -> anyhow::Result<EntityStateUpdate> {
    let entity_id = u16::try_from(index + 1).context("entity index exceeds the DIS id range")?;
    let id = SessionEntityIdentifier::new(config.session_id, 1, 1, entity_id);
    let infantry = EntityType {
        kind: 1,
        domain: 1,
        country: 225,
        category: 3,
        subcategory: 0,
        specific: 0,
    };
    let mut update = EntityStateUpdate::new(id, location, force_for(index), infantry).with_role(role);
    update.entity_marking = Some(format!("E{}", entity_id));
    update.playable = force_for(index) == 1;
    Ok(update)
}

/// Assessment snapshot covering every role still reporting at `step`.
fn session_state(
    config: &GeneratorConfig,
    roles: &[String],
    step: usize,
    at_ms: u64,
    rng: &mut StdRng,
) -> KnowledgeSessionState {
    let leaves = roles
        .iter()
        .enumerate()
        .filter(|(index, _)| !config.go_silent(*index, step))
        .map(|(index, role)| {
            let level = LEVELS[rng.gen_range(0..LEVELS.len())];
            let mut attribute = PerformanceStateAttribute::new(
                FIRST_ROLE_CONCEPT_ID + index as u32,
                &concept_name(role),
                level,
            );
            attribute.short_term_timestamp = at_ms;
            attribute
                .assessed_team_org_entities
                .insert(role.clone(), Some(level));
            let concept = ConceptPerformanceState::leaf(attribute);
            if index == 0 {
                concept.observed()
            } else {
                concept
            }
        })
        .collect();

    let mut movement = PerformanceStateAttribute::new(MOVEMENT_CONCEPT_ID, "Movement", AssessmentLevel::Unknown);
    movement.short_term_timestamp = at_ms;
    let task = TaskPerformanceState::new(
        PerformanceStateAttribute::new(TASK_ID, "Secure the perimeter", AssessmentLevel::Unknown),
        vec![ConceptPerformanceState::intermediate(movement, leaves)],
    );

    let mut performance = PerformanceState::default();
    performance.tasks.insert(TASK_ID, task);
    KnowledgeSessionState {
        performance: Some(performance),
        team: Some(TeamNode::team(
            "Squad",
            roles.iter().map(|role| TeamNode::role(role)).collect(),
        )),
    }
}

pub fn build_scenario_from_config(config: &GeneratorConfig) -> anyhow::Result<Scenario> {
    let entities = config.normalized_entities();
    let steps = config.normalized_steps();
    let capacity = entities
        .checked_mul(steps)
        .context("overflow computing event count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let roles: Vec<String> = (0..entities).map(role_name).collect();
    let mut positions: Vec<Location> = (0..entities)
        .map(|index| {
            Location::new(
                config.origin.latitude + index as f64 * 0.0005,
                config.origin.longitude,
                config.origin.altitude,
            )
        })
        .collect();
    let mut events = Vec::with_capacity(capacity);

    for step in 0..steps {
        let at_ms = step as u64 * config.step_ms;
        for (index, role) in roles.iter().enumerate() {
            if config.go_silent(index, step) {
                continue;
            }
            let position = &mut positions[index];
            position.latitude += rng.gen_range(-STEP_DEGREES..STEP_DEGREES);
            position.longitude += rng.gen_range(-STEP_DEGREES..STEP_DEGREES);
            let update = entity_update(config, index, role, *position)?;
            events.push(TimedEvent {
                at_ms,
                event: ScenarioEvent::Entity(update),
            });
        }

        if config.assessment_every > 0 && step % config.assessment_every == 0 {
            events.push(TimedEvent {
                at_ms,
                event: ScenarioEvent::SessionState {
                    session_id: config.session_id,
                    state: session_state(config, &roles, step, at_ms, &mut rng),
                },
            });
        }

        if config.detonation_every > 0 && step > 0 && step % config.detonation_every == 0 {
            let target = rng.gen_range(0..entities);
            let shooter = (target + 1) % entities;
            let detonation_result = if rng.gen_bool(0.5) {
                DetonationResult::EntityImpact
            } else {
                DetonationResult::GroundImpact
            };
            events.push(TimedEvent {
                at_ms,
                event: ScenarioEvent::Detonation(DetonationUpdate {
                    host_domain_session_id: config.session_id,
                    location: positions[target],
                    firing_entity_location: (shooter != target).then(|| positions[shooter]),
                    force_id: force_for(shooter),
                    detonation_result,
                }),
            });
        }
    }

    Ok(Scenario {
        name: config
            .scenario
            .clone()
            .unwrap_or_else(|| format!("generated-{}", config.seed)),
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn count(scenario: &Scenario, matches: fn(&ScenarioEvent) -> bool) -> usize {
        scenario.events.iter().filter(|event| matches(&event.event)).count()
    }

    #[test]
    fn generator_emits_expected_event_mix() {
        let config = GeneratorConfig {
            entities: 3,
            steps: 10,
            silent_after: Some(4),
            assessment_every: 5,
            detonation_every: 4,
            ..Default::default()
        };
        let scenario = build_scenario_from_config(&config).unwrap();
        assert_eq!(count(&scenario, |event| matches!(event, ScenarioEvent::Entity(_))), 24);
        assert_eq!(
            count(&scenario, |event| matches!(event, ScenarioEvent::SessionState { .. })),
            2
        );
        assert_eq!(count(&scenario, |event| matches!(event, ScenarioEvent::Detonation(_))), 2);
        assert_eq!(scenario.duration_ms(), 9_000);
    }

    #[test]
    fn silent_entity_stops_reporting() {
        let config = GeneratorConfig {
            entities: 2,
            steps: 6,
            silent_after: Some(3),
            ..Default::default()
        };
        let scenario = build_scenario_from_config(&config).unwrap();
        let last_report = scenario
            .events
            .iter()
            .filter_map(|timed| match &timed.event {
                ScenarioEvent::Entity(update) if update.role() == Some("Bravo") => Some(timed.at_ms),
                _ => None,
            })
            .max();
        assert_eq!(last_report, Some(2_000));
    }

    #[test]
    fn same_seed_reproduces_the_session() {
        let seeded = |seed| {
            build_scenario_from_config(&GeneratorConfig {
                entities: 4,
                steps: 15,
                seed,
                ..Default::default()
            })
            .unwrap()
        };
        assert_eq!(seeded(9), seeded(9));
        assert_ne!(seeded(9), seeded(10));
    }

    #[test]
    fn scenario_loads_from_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"name: drill\nevents:\n  - at_ms: 500\n    event: {kind: pause}\n  - at_ms: 100\n    event:\n      kind: select\n      session_id: 1\n      roles: [Alpha]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.name, "drill");
        let order: Vec<u64> = scenario.timeline().iter().map(|event| event.at_ms).collect();
        assert_eq!(order, vec![100, 500]);
    }
}
