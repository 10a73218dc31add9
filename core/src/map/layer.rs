use crate::map::assessment::TeamAssessmentEvaluator;
use crate::map::data_point::{DrawContext, MapDataPoint};
use crate::map::entity::{EntityDataPoint, RoleChange, StatusChange};
use crate::map::role_index::RoleIndex;
use crate::map::shape::ShapeFactory;
use crate::map::symbol::SymbolStatus;
use crate::messages::{EntityStateUpdate, KnowledgeSessionState, SessionEntityIdentifier};
use crate::prelude::{AssessmentLevel, DashboardError, DashboardResult};
use crate::telemetry::{AlertCounter, LogManager};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// An entity that left its layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEntity {
    pub id: SessionEntityIdentifier,
    pub role: Option<String>,
    pub was_selected: bool,
}

/// Result of routing one entity state update through a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityUpdateOutcome {
    Created(Option<StatusChange>),
    Updated(Option<StatusChange>),
    Removed(RemovedEntity),
    /// Inactive update for an entity the layer never drew.
    Ignored,
}

/// Entities of one knowledge session and their role bookkeeping.
pub struct SessionMapLayer {
    session_id: u32,
    entities: HashMap<SessionEntityIdentifier, EntityDataPoint>,
    roles: RoleIndex,
    alert_roles: BTreeSet<String>,
    role_assessments: HashMap<String, AssessmentLevel>,
    alerts: Arc<AlertCounter>,
    logger: LogManager,
}

impl SessionMapLayer {
    pub fn new(session_id: u32, alerts: Arc<AlertCounter>) -> Self {
        Self {
            session_id,
            entities: HashMap::new(),
            roles: RoleIndex::new(),
            alert_roles: BTreeSet::new(),
            role_assessments: HashMap::new(),
            alerts,
            logger: LogManager::new("gmcore::map::layer"),
        }
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn add_shape_to_layer(&mut self, mut entity: EntityDataPoint) -> DashboardResult<()> {
        let id = entity.id();
        if id.host_domain_session_id != self.session_id {
            return Err(DashboardError::LayerMismatch {
                entity_session: id.host_domain_session_id,
                layer_session: self.session_id,
            });
        }

        let role = entity.role().map(str::to_string);
        if let Some(role) = &role {
            entity.apply_assessment(self.role_assessments.get(role).copied());
        }
        if let Some(mut replaced) = self.entities.insert(id, entity) {
            replaced.erase();
            if let Some(stale) = self.roles.remove_entity(&id) {
                self.remove_alert_entity(&stale);
            }
        }
        if let Some(role) = role {
            self.roles.insert(&role, id);
        }
        Ok(())
    }

    /// Creates, updates or removes the entity named by `update`.
    pub fn apply_entity_update(
        &mut self,
        update: EntityStateUpdate,
        factory: &mut ShapeFactory,
        ctx: &DrawContext<'_>,
    ) -> DashboardResult<EntityUpdateOutcome> {
        let id = update.session_entity_id;

        if !self.entities.contains_key(&id) {
            if !update.active {
                return Ok(EntityUpdateOutcome::Ignored);
            }
            let entity = EntityDataPoint::new(update, factory)?;
            self.add_shape_to_layer(entity)?;
            let change = self.draw_entity(&id, ctx);
            return Ok(EntityUpdateOutcome::Created(change));
        }

        if !update.active {
            return Ok(self
                .remove_entity(&id)
                .map(EntityUpdateOutcome::Removed)
                .unwrap_or(EntityUpdateOutcome::Ignored));
        }

        let role_change = match self.entities.get_mut(&id) {
            Some(entity) => entity.set_state(update)?,
            None => None,
        };
        if let Some(change) = role_change {
            self.rekey_role(&change);
        }
        Ok(EntityUpdateOutcome::Updated(self.draw_entity(&id, ctx)))
    }

    fn rekey_role(&mut self, change: &RoleChange) {
        self.logger.detail(&format!(
            "entity {} role {:?} -> {:?}",
            change.entity, change.previous, change.current
        ));
        if let Some(previous) = self.roles.remove_entity(&change.entity) {
            self.remove_alert_entity(&previous);
        }
        let assessment = match &change.current {
            Some(role) => {
                self.roles.insert(role, change.entity);
                self.role_assessments.get(role).copied()
            }
            None => None,
        };
        let destroyed = match self.entities.get_mut(&change.entity) {
            Some(entity) => {
                entity.apply_assessment(assessment);
                entity.status().needs_attention()
            }
            None => false,
        };
        if destroyed {
            if let Some(role) = &change.current {
                self.add_alert_entity(role);
            }
        }
    }

    fn draw_entity(
        &mut self,
        id: &SessionEntityIdentifier,
        ctx: &DrawContext<'_>,
    ) -> Option<StatusChange> {
        let change = self.entities.get_mut(id)?.draw(ctx)?;
        self.handle_status_change(&change);
        Some(change)
    }

    /// Keeps the alert set in step with a status transition.
    pub fn handle_status_change(&mut self, change: &StatusChange) {
        let Some(role) = change.role.as_deref() else {
            return;
        };
        if change.previous == Some(SymbolStatus::PresentDestroyed) {
            self.remove_alert_entity(role);
        } else if change.current == SymbolStatus::PresentDestroyed {
            self.add_alert_entity(role);
        }
    }

    /// Removes the entity from both indices and erases it. Unknown ids are logged.
    pub fn remove_entity(&mut self, id: &SessionEntityIdentifier) -> Option<RemovedEntity> {
        let Some(mut entity) = self.entities.remove(id) else {
            self.logger
                .warn(&format!("cannot remove unknown entity {} from session {}", id, self.session_id));
            return None;
        };
        let role = self.roles.remove_entity(id);
        if let Some(role) = &role {
            self.remove_alert_entity(role);
        }
        entity.erase();
        Some(RemovedEntity {
            id: *id,
            role,
            was_selected: entity.is_selected(),
        })
    }

    pub fn update_team_role_assessments(
        &mut self,
        state: &KnowledgeSessionState,
        evaluator: &dyn TeamAssessmentEvaluator,
        ctx: &DrawContext<'_>,
    ) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for (role, level) in evaluator.evaluate(state) {
            if self.role_assessments.get(&role) == Some(&level) {
                continue;
            }
            self.role_assessments.insert(role.clone(), level);

            let entity_id = self
                .roles
                .entity(&role)
                .filter(|id| self.entities.contains_key(id));
            match entity_id {
                Some(id) => {
                    if let Some(entity) = self.entities.get_mut(&id) {
                        entity.apply_assessment(Some(level));
                    }
                    if let Some(change) = self.draw_entity(&id, ctx) {
                        changes.push(change);
                    }
                }
                None => {
                    let change = StatusChange {
                        session_id: self.session_id,
                        role: Some(role),
                        entity: None,
                        previous: None,
                        current: SymbolStatus::for_entity(true, Some(level)),
                    };
                    self.handle_status_change(&change);
                    changes.push(change);
                }
            }
        }
        changes
    }

    /// Marks a role as needing attention. Blank or unmapped roles are rejected.
    pub fn add_alert_entity(&mut self, role: &str) -> bool {
        let role = role.trim();
        if role.is_empty() || self.roles.entity(role).is_none() {
            return false;
        }
        let added = self.alert_roles.insert(role.to_string());
        if added {
            self.alerts.add(1);
        }
        added
    }

    pub fn remove_alert_entity(&mut self, role: &str) -> bool {
        let removed = self.alert_roles.remove(role.trim());
        if removed {
            self.alerts.add(-1);
        }
        removed
    }

    pub fn redraw_data_points(&mut self, ctx: &DrawContext<'_>) -> Vec<StatusChange> {
        let ids: Vec<_> = self.entities.keys().copied().collect();
        ids.iter()
            .filter_map(|id| self.draw_entity(id, ctx))
            .collect()
    }

    /// Purges entities whose liveness timer fired.
    pub fn poll_liveness(&mut self, now_ms: u64) -> Vec<RemovedEntity> {
        let expired: Vec<_> = self
            .entities
            .iter_mut()
            .filter_map(|(id, entity)| entity.poll_liveness(now_ms).then_some(*id))
            .collect();
        expired
            .iter()
            .filter_map(|id| {
                self.logger
                    .record(&format!("entity {} stopped reporting, removing", id));
                self.remove_entity(id)
            })
            .collect()
    }

    /// Erases every entity and drops this layer's alerts from the shared counter.
    pub fn clear(&mut self) {
        for entity in self.entities.values_mut() {
            entity.erase();
        }
        self.entities.clear();
        self.roles.clear();
        let alerts = self.alert_roles.len() as i64;
        if alerts > 0 {
            self.alerts.add(-alerts);
        }
        self.alert_roles.clear();
    }

    pub fn entity(&self, id: &SessionEntityIdentifier) -> Option<&EntityDataPoint> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: &SessionEntityIdentifier) -> Option<&mut EntityDataPoint> {
        self.entities.get_mut(id)
    }

    pub fn entity_for_role(&self, role: &str) -> Option<&EntityDataPoint> {
        self.roles.entity(role).and_then(|id| self.entities.get(&id))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDataPoint> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn alert_roles(&self) -> &BTreeSet<String> {
        &self.alert_roles
    }

    pub fn role_assessment(&self, role: &str) -> Option<AssessmentLevel> {
        self.role_assessments.get(role).copied()
    }

    /// Every role in the index names an entity this layer owns.
    pub fn is_index_consistent(&self) -> bool {
        self.roles.is_consistent()
            && self
                .roles
                .roles()
                .all(|(_, id)| self.entities.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::assessment::WorstConceptEvaluator;
    use crate::map::entity::tests::{factory, update};
    use crate::map::headless::SurfaceProbe;
    use crate::map::symbol::SymbolUrlGenerator;
    use crate::messages::{
        ConceptPerformanceState, PerformanceState, PerformanceStateAttribute, TaskPerformanceState,
    };
    use crate::prelude::DisplaySettings;
    use proptest::prelude::*;

    struct Fixture {
        layer: SessionMapLayer,
        factory: ShapeFactory,
        probe: SurfaceProbe,
        alerts: Arc<AlertCounter>,
        settings: DisplaySettings,
        symbols: SymbolUrlGenerator,
    }

    impl Fixture {
        fn new() -> Self {
            let alerts = Arc::new(AlertCounter::new());
            let (factory, probe) = factory();
            Self {
                layer: SessionMapLayer::new(1, Arc::clone(&alerts)),
                factory,
                probe,
                alerts,
                settings: DisplaySettings::default(),
                symbols: SymbolUrlGenerator::default(),
            }
        }

        fn push(&mut self, update: EntityStateUpdate) -> EntityUpdateOutcome {
            let ctx = DrawContext::new(&self.settings, &self.symbols, 0);
            self.layer
                .apply_entity_update(update, &mut self.factory, &ctx)
                .unwrap()
        }

        fn assess(&mut self, role: &str, level: AssessmentLevel) -> Vec<StatusChange> {
            let mut attribute = PerformanceStateAttribute::new(2, "cover", level);
            attribute
                .assessed_team_org_entities
                .insert(role.to_string(), Some(level));
            let mut performance = PerformanceState::default();
            performance.tasks.insert(
                1,
                TaskPerformanceState::new(
                    PerformanceStateAttribute::new(1, "move", AssessmentLevel::Unknown),
                    vec![ConceptPerformanceState::leaf(attribute)],
                ),
            );
            let state = KnowledgeSessionState {
                performance: Some(performance),
                team: None,
            };
            let ctx = DrawContext::new(&self.settings, &self.symbols, 0);
            self.layer
                .update_team_role_assessments(&state, &WorstConceptEvaluator, &ctx)
        }
    }

    #[test]
    fn rejects_entities_from_another_session() {
        let mut fx = Fixture::new();
        let foreign = EntityDataPoint::new(update(2, 1), &mut fx.factory).unwrap();
        assert!(matches!(
            fx.layer.add_shape_to_layer(foreign),
            Err(DashboardError::LayerMismatch {
                entity_session: 2,
                layer_session: 1
            })
        ));
    }

    #[test]
    fn below_assessment_destroys_symbol_and_pulses_once() {
        let mut fx = Fixture::new();
        fx.push(update(1, 1).with_role("Alpha"));

        let changes = fx.assess("Alpha", AssessmentLevel::BelowExpectation);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].current, SymbolStatus::PresentDestroyed);
        assert_eq!(fx.probe.total_pulses(), 1);
        assert_eq!(fx.alerts.count(), 1);
        assert!(fx.layer.alert_roles().contains("Alpha"));

        assert!(fx.assess("Alpha", AssessmentLevel::BelowExpectation).is_empty());
        assert_eq!(fx.probe.total_pulses(), 1);
    }

    #[test]
    fn cached_assessment_applies_to_late_entity() {
        let mut fx = Fixture::new();
        let changes = fx.assess("Bravo", AssessmentLevel::AtExpectation);
        assert_eq!(changes[0].previous, None);
        assert_eq!(changes[0].entity, None);
        assert_eq!(fx.alerts.count(), 0);

        fx.push(update(1, 5).with_role("Bravo"));
        let entity = fx.layer.entity_for_role("Bravo").unwrap();
        assert_eq!(entity.assessment(), Some(AssessmentLevel::AtExpectation));
        assert_eq!(entity.status(), SymbolStatus::PresentFullyCapable);
    }

    #[test]
    fn removing_entity_clears_role_and_alert() {
        let mut fx = Fixture::new();
        fx.push(update(1, 1).with_role("Alpha"));
        fx.assess("Alpha", AssessmentLevel::BelowExpectation);

        let mut gone = update(1, 1).with_role("Alpha");
        gone.active = false;
        let outcome = fx.push(gone);
        assert!(matches!(outcome, EntityUpdateOutcome::Removed(ref removed) if removed.role.as_deref() == Some("Alpha")));
        assert_eq!(fx.alerts.count(), 0);
        assert!(fx.layer.entity_for_role("Alpha").is_none());
        assert_eq!(fx.layer.role_assessment("Alpha"), Some(AssessmentLevel::BelowExpectation));
        assert!(fx.layer.remove_entity(&update(1, 1).session_entity_id).is_none());
    }

    #[test]
    fn role_change_moves_alert_to_new_role() {
        let mut fx = Fixture::new();
        fx.push(update(1, 1).with_role("Alpha"));
        fx.assess("Alpha", AssessmentLevel::BelowExpectation);
        fx.assess("Bravo", AssessmentLevel::BelowExpectation);

        fx.push(update(1, 1).with_role("Bravo"));
        assert_eq!(fx.layer.alert_roles().iter().collect::<Vec<_>>(), vec!["Bravo"]);
        assert_eq!(fx.alerts.count(), 1);
        assert!(fx.layer.entity_for_role("Alpha").is_none());
        assert!(fx.layer.is_index_consistent());
    }

    #[test]
    fn alerts_for_unknown_or_blank_roles_are_rejected() {
        let mut fx = Fixture::new();
        fx.push(update(1, 1).with_role("Alpha"));
        assert!(!fx.layer.add_alert_entity(""));
        assert!(!fx.layer.add_alert_entity("Ghost"));
        assert!(fx.layer.add_alert_entity("Alpha"));
        assert!(!fx.layer.add_alert_entity("Alpha"));
        assert_eq!(fx.alerts.count(), 1);
        assert!(fx.layer.remove_alert_entity("Alpha"));
        assert!(!fx.layer.remove_alert_entity("Alpha"));
        assert_eq!(fx.alerts.count(), 0);
    }

    #[test]
    fn inactive_update_for_unknown_entity_is_ignored() {
        let mut fx = Fixture::new();
        let mut inactive = update(1, 9);
        inactive.active = false;
        assert_eq!(fx.push(inactive), EntityUpdateOutcome::Ignored);
        assert!(fx.layer.is_empty());
    }

    #[test]
    fn silent_entities_are_purged_after_timeout() {
        let mut fx = Fixture::new();
        fx.push(update(1, 1).with_role("Alpha"));
        assert!(fx.layer.poll_liveness(29_000).is_empty());
        let removed = fx.layer.poll_liveness(30_000);
        assert_eq!(removed.len(), 1);
        assert!(fx.layer.is_empty());
        assert_eq!(fx.probe.rendered_point_count(), 0);
    }

    proptest! {
        #[test]
        fn role_index_only_names_owned_entities(
            ops in proptest::collection::vec((0u16..4, 0u8..4, any::<bool>()), 1..48)
        ) {
            let mut fx = Fixture::new();
            for (entity, role, active) in ops {
                let mut next = update(1, entity);
                if role > 0 {
                    next = next.with_role(&format!("role{}", role));
                }
                next.active = active;
                fx.push(next);
                prop_assert!(fx.layer.is_index_consistent());
            }
        }
    }
}
