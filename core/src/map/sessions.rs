use crate::map::assessment::{TeamAssessmentEvaluator, WorstConceptEvaluator};
use crate::map::data_point::{
    DrawContext, MapDataPoint, MappableData, DETONATION_Z_INDEX, FIRE_LINE_Z_INDEX,
};
use crate::map::entity::StatusChange;
use crate::map::layer::{EntityUpdateOutcome, RemovedEntity, SessionMapLayer};
use crate::map::liveness::{DetonationPhase, DetonationTimer};
use crate::map::render::{ClickTarget, LineHandle};
use crate::map::shape::{MapShape, ShapeFactory};
use crate::map::symbol::{Affiliation, SymbolUrlGenerator};
use crate::math::geo::{GeoBounds, GeoHelper};
use crate::messages::{
    DetonationResult, DetonationUpdate, EntityStateUpdate, KnowledgeSessionState, Location,
    RemoveEntityMessage, SessionEntityIdentifier,
};
use crate::prelude::{DashboardResult, DisplaySettings};
use crate::telemetry::{AlertCounter, LogManager};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Receives every entity status transition on the sessions map.
pub trait EntityStatusListener: Send {
    fn entity_status_changed(&mut self, change: &StatusChange) -> DashboardResult<()>;
}

struct StatusNotifier {
    listeners: Vec<Box<dyn EntityStatusListener>>,
    logger: LogManager,
}

impl StatusNotifier {
    /// Every listener runs even when an earlier one fails. Returns the failure count.
    fn notify(&mut self, change: &StatusChange) -> usize {
        let mut failures = 0;
        for (index, listener) in self.listeners.iter_mut().enumerate() {
            if let Err(err) = listener.entity_status_changed(change) {
                failures += 1;
                self.logger.warn(&format!(
                    "status listener {} failed for role {:?}: {}",
                    index, change.role, err
                ));
            }
        }
        failures
    }
}

/// Camera instruction for the map collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewRequest {
    Fit(GeoBounds),
    Center(Location),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedItem {
    Entity(SessionEntityIdentifier),
    Detonation(u64),
}

struct Detonation {
    id: u64,
    session_id: u32,
    shape: MapShape,
    data: MappableData,
    fire_line: Option<Box<dyn LineHandle>>,
    timer: DetonationTimer,
}

impl Detonation {
    fn erase(&mut self) {
        self.shape.erase();
        if let Some(line) = self.fire_line.as_mut() {
            line.erase();
        }
    }
}

/// What one timer pass over the map changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    pub removed: Vec<RemovedEntity>,
    pub faded_detonations: usize,
    pub expired_detonations: usize,
}

/// All session layers sharing one main map and minimap.
pub struct SessionsMap {
    layers: BTreeMap<u32, SessionMapLayer>,
    factory: ShapeFactory,
    symbols: SymbolUrlGenerator,
    settings: DisplaySettings,
    alerts: Arc<AlertCounter>,
    notifier: StatusNotifier,
    evaluator: Box<dyn TeamAssessmentEvaluator>,
    selected: Option<SelectedItem>,
    auto_fit: bool,
    view_requests: Vec<ViewRequest>,
    detonations: Vec<Detonation>,
    next_detonation: u64,
    now_ms: u64,
    logger: LogManager,
}

impl SessionsMap {
    pub fn new(factory: ShapeFactory, symbols: SymbolUrlGenerator, settings: DisplaySettings) -> Self {
        let logger = LogManager::new("gmcore::map::sessions");
        Self {
            layers: BTreeMap::new(),
            factory,
            symbols,
            settings,
            alerts: Arc::new(AlertCounter::new()),
            notifier: StatusNotifier {
                listeners: Vec::new(),
                logger,
            },
            evaluator: Box::new(WorstConceptEvaluator),
            selected: None,
            auto_fit: false,
            view_requests: Vec::new(),
            detonations: Vec::new(),
            next_detonation: 0,
            now_ms: 0,
            logger,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn TeamAssessmentEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn add_status_listener(&mut self, listener: Box<dyn EntityStatusListener>) {
        self.notifier.listeners.push(listener);
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Applies new display settings and redraws everything under them.
    pub fn update_settings(&mut self, settings: DisplaySettings) -> Vec<StatusChange> {
        self.settings = settings;
        self.redraw_data_points(self.now_ms)
    }

    pub fn alerts(&self) -> Arc<AlertCounter> {
        Arc::clone(&self.alerts)
    }

    pub fn layer(&self, session_id: u32) -> Option<&SessionMapLayer> {
        self.layers.get(&session_id)
    }

    pub fn layers(&self) -> impl Iterator<Item = &SessionMapLayer> {
        self.layers.values()
    }

    fn ensure_layer(&mut self, session_id: u32) {
        let alerts = &self.alerts;
        self.layers
            .entry(session_id)
            .or_insert_with(|| SessionMapLayer::new(session_id, Arc::clone(alerts)));
    }

    pub fn entity_location_update(
        &mut self,
        update: EntityStateUpdate,
        now_ms: u64,
    ) -> DashboardResult<EntityUpdateOutcome> {
        self.now_ms = now_ms;
        let session_id = update.session_entity_id.host_domain_session_id;
        let was_empty = self.is_map_empty();
        self.ensure_layer(session_id);

        let outcome = match self.layers.get_mut(&session_id) {
            Some(layer) => {
                let ctx = DrawContext::new(&self.settings, &self.symbols, now_ms);
                layer.apply_entity_update(update, &mut self.factory, &ctx)?
            }
            None => EntityUpdateOutcome::Ignored,
        };

        match &outcome {
            EntityUpdateOutcome::Created(change) => {
                if let Some(change) = change {
                    self.notifier.notify(change);
                }
                if was_empty {
                    self.auto_fit = true;
                }
                if self.auto_fit {
                    self.reset_zoom();
                }
            }
            EntityUpdateOutcome::Updated(Some(change)) => {
                self.notifier.notify(change);
            }
            EntityUpdateOutcome::Removed(removed) => self.after_removal(removed),
            EntityUpdateOutcome::Updated(None) | EntityUpdateOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    fn after_removal(&mut self, removed: &RemovedEntity) {
        if removed.was_selected && self.selected == Some(SelectedItem::Entity(removed.id)) {
            self.selected = None;
        }
    }

    pub fn remove_entity_request(&mut self, message: &RemoveEntityMessage) -> Option<RemovedEntity> {
        let id = message.session_entity_id;
        let removed = self
            .layers
            .get_mut(&id.host_domain_session_id)?
            .remove_entity(&id)?;
        self.after_removal(&removed);
        Some(removed)
    }

    /// Drops a session's layer along with its detonations.
    pub fn remove_session(&mut self, session_id: u32) -> bool {
        let Some(mut layer) = self.layers.remove(&session_id) else {
            return false;
        };
        layer.clear();
        if let Some(SelectedItem::Entity(id)) = self.selected {
            if id.host_domain_session_id == session_id {
                self.selected = None;
            }
        }
        self.detonations.retain_mut(|detonation| {
            let keep = detonation.session_id != session_id;
            if !keep {
                detonation.erase();
            }
            keep
        });
        self.logger
            .record(&format!("removed session {} from the map", session_id));
        true
    }

    /// Re-evaluates team-role assessments for one session.
    pub fn session_state_update(
        &mut self,
        session_id: u32,
        state: &KnowledgeSessionState,
        now_ms: u64,
    ) -> Vec<StatusChange> {
        self.now_ms = now_ms;
        if state.is_visual_only() {
            self.logger.detail(&format!(
                "skipping visual-only state for session {}",
                session_id
            ));
            return Vec::new();
        }
        self.ensure_layer(session_id);
        let changes = match self.layers.get_mut(&session_id) {
            Some(layer) => {
                let ctx = DrawContext::new(&self.settings, &self.symbols, now_ms);
                layer.update_team_role_assessments(state, self.evaluator.as_ref(), &ctx)
            }
            None => Vec::new(),
        };
        for change in &changes {
            self.notifier.notify(change);
        }
        changes
    }

    pub fn selected(&self) -> Option<SelectedItem> {
        self.selected
    }

    /// Selects `item`, deselecting the previous one. Selecting the current
    /// entity again toggles it off. Returns the resulting selection.
    pub fn set_selected_map_data(
        &mut self,
        item: Option<SelectedItem>,
        now_ms: u64,
    ) -> Option<SelectedItem> {
        self.now_ms = now_ms;
        if item.is_some() && item == self.selected {
            let still_selected = match item {
                Some(SelectedItem::Entity(id)) => self.select_entity(&id, true, now_ms),
                _ => false,
            };
            if !still_selected {
                self.selected = None;
            }
            return self.selected;
        }

        if let Some(SelectedItem::Entity(previous)) = self.selected.take() {
            self.select_entity(&previous, false, now_ms);
        }

        let location = match item {
            Some(SelectedItem::Entity(id)) => {
                if self.select_entity(&id, true, now_ms) {
                    self.selected = item;
                }
                self.entity_location(&id)
            }
            Some(SelectedItem::Detonation(id)) => {
                let found = self.detonations.iter().find(|detonation| detonation.id == id);
                if found.is_some() {
                    self.selected = item;
                }
                found.map(|detonation| detonation.data.location)
            }
            None => None,
        };
        if let (Some(location), Some(_)) = (location, self.selected) {
            self.view_requests.push(ViewRequest::Center(location));
        }
        self.selected
    }

    fn select_entity(&mut self, id: &SessionEntityIdentifier, selected: bool, now_ms: u64) -> bool {
        let Some(layer) = self.layers.get_mut(&id.host_domain_session_id) else {
            return false;
        };
        let Some(entity) = layer.entity_mut(id) else {
            return false;
        };
        let applied = entity.set_selected(selected);
        let ctx = DrawContext::new(&self.settings, &self.symbols, now_ms);
        if let Some(change) = entity.draw(&ctx) {
            layer.handle_status_change(&change);
            self.notifier.notify(&change);
        }
        applied
    }

    fn entity_location(&self, id: &SessionEntityIdentifier) -> Option<Location> {
        self.layers
            .get(&id.host_domain_session_id)?
            .entity(id)
            .map(|entity| *entity.location())
    }

    /// Centres the view on the entities filling `roles` and pulses them.
    pub fn entity_selected(&mut self, session_id: u32, roles: &[String]) -> usize {
        let Some(layer) = self.layers.get_mut(&session_id) else {
            return 0;
        };
        let ids: Vec<_> = roles
            .iter()
            .filter_map(|role| layer.entity_for_role(role).map(|entity| entity.id()))
            .collect();
        let mut locations = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(entity) = layer.entity_mut(id) {
                entity.play_pulse_animation();
                locations.push(*entity.location());
            }
        }
        match locations.as_slice() {
            [] => {}
            [single] => self.view_requests.push(ViewRequest::Center(*single)),
            many => {
                if let Some(bounds) = GeoHelper::bounds(many.iter()) {
                    self.view_requests.push(ViewRequest::Fit(bounds));
                }
            }
        }
        locations.len()
    }

    pub fn detonation_update(&mut self, update: &DetonationUpdate, now_ms: u64) -> u64 {
        self.now_ms = now_ms;
        let id = self.next_detonation;
        self.next_detonation += 1;

        let entity_impact = update.detonation_result == DetonationResult::EntityImpact;
        let data = MappableData {
            location: update.location,
            name: None,
            icon_url: self
                .symbols
                .detonation_url(entity_impact, self.settings.mil_symbol_scale),
            priority: DETONATION_Z_INDEX,
            data_label: None,
            selected: false,
        };
        let mut shape = self
            .factory
            .create_shape(&update.location, ClickTarget::Detonation(id));
        shape.draw(&data);

        let fire_line = update.firing_entity_location.map(|firing| {
            let mut line = self.factory.create_line(&[firing, update.location]);
            line.set_color(Affiliation::from_force_id(update.force_id).fire_line_color());
            line.set_z_index(FIRE_LINE_Z_INDEX);
            line.draw();
            line
        });

        self.detonations.push(Detonation {
            id,
            session_id: update.host_domain_session_id,
            shape,
            data,
            fire_line,
            timer: DetonationTimer::start(now_ms),
        });
        id
    }

    pub fn detonation_count(&self) -> usize {
        self.detonations.len()
    }

    /// Runs liveness and detonation timers. Detonations hold still while `paused`.
    pub fn poll(&mut self, now_ms: u64, paused: bool) -> PollReport {
        self.now_ms = now_ms;
        let mut report = PollReport::default();
        for layer in self.layers.values_mut() {
            report.removed.extend(layer.poll_liveness(now_ms));
        }
        let removed = std::mem::take(&mut report.removed);
        for entry in &removed {
            self.after_removal(entry);
        }
        report.removed = removed;

        let mut deselect = None;
        self.detonations.retain_mut(|detonation| match detonation.timer.poll(now_ms, paused) {
            Some(DetonationPhase::Fading) => {
                report.faded_detonations += 1;
                detonation.shape.set_fading(true);
                detonation.shape.draw(&detonation.data);
                true
            }
            Some(DetonationPhase::Expired) => {
                report.expired_detonations += 1;
                detonation.erase();
                deselect = Some(detonation.id);
                false
            }
            None => true,
        });
        if let Some(id) = deselect {
            if self.selected == Some(SelectedItem::Detonation(id)) {
                self.selected = None;
            }
        }
        report
    }

    pub fn redraw_data_points(&mut self, now_ms: u64) -> Vec<StatusChange> {
        self.now_ms = now_ms;
        let ctx = DrawContext::new(&self.settings, &self.symbols, now_ms);
        let mut changes = Vec::new();
        for layer in self.layers.values_mut() {
            changes.extend(layer.redraw_data_points(&ctx));
        }
        for change in &changes {
            self.notifier.notify(change);
        }
        changes
    }

    pub fn map_entity_count(&self) -> usize {
        self.layers.values().map(SessionMapLayer::entity_count).sum()
    }

    pub fn is_map_empty(&self) -> bool {
        self.map_entity_count() == 0
    }

    pub fn alert_entity_roles(&self) -> BTreeMap<u32, Vec<String>> {
        self.layers
            .values()
            .filter(|layer| !layer.alert_roles().is_empty())
            .map(|layer| {
                (
                    layer.session_id(),
                    layer.alert_roles().iter().cloned().collect(),
                )
            })
            .collect()
    }

    pub fn is_auto_fit(&self) -> bool {
        self.auto_fit
    }

    /// The user panned or zoomed; stop fitting the view automatically.
    pub fn user_changed_bounds(&mut self) {
        self.auto_fit = false;
    }

    /// Requests a view fitting every entity on the map.
    pub fn reset_zoom(&mut self) -> Option<GeoBounds> {
        let bounds = GeoHelper::bounds(
            self.layers
                .values()
                .flat_map(|layer| layer.entities().map(|entity| entity.location())),
        )?;
        self.view_requests.push(ViewRequest::Fit(bounds));
        Some(bounds)
    }

    pub fn take_view_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.view_requests)
    }
}
