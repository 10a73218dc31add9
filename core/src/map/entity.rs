use crate::map::data_point::{
    DrawContext, MapDataPoint, MappableData, Selection, HAS_LEARNER_Z_INDEX, PLAYABLE_Z_INDEX,
    SELECTED_Z_INDEX,
};
use crate::map::liveness::LivenessTimer;
use crate::map::render::ClickTarget;
use crate::map::shape::{MapShape, ShapeFactory};
use crate::map::symbol::{Affiliation, MilitarySymbol, Sidc, SymbolStatus};
use crate::messages::{EntityStateUpdate, Location, SessionEntityIdentifier};
use crate::prelude::{AssessmentLevel, DashboardError, DashboardResult};

/// An entity's role assignment changed between two updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    pub entity: SessionEntityIdentifier,
    pub previous: Option<String>,
    pub current: Option<String>,
}

/// Visual status transition of a role's symbol.
///
/// `entity` and `previous` are `None` when the role has no entity on the map yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub session_id: u32,
    pub role: Option<String>,
    pub entity: Option<SessionEntityIdentifier>,
    pub previous: Option<SymbolStatus>,
    pub current: SymbolStatus,
}

/// One simulated entity drawn on a session's map.
pub struct EntityDataPoint {
    id: SessionEntityIdentifier,
    state: EntityStateUpdate,
    symbol: MilitarySymbol,
    sidc: Sidc,
    assessment: Option<AssessmentLevel>,
    has_been_erased: bool,
    selection: Selection,
    shape: MapShape,
    liveness: LivenessTimer,
}

fn validate(update: &EntityStateUpdate) -> DashboardResult<(Location, u8)> {
    let location = update.location.ok_or(DashboardError::MissingField("location"))?;
    let force_id = update.force_id.ok_or(DashboardError::MissingField("force_id"))?;
    update
        .entity_type
        .as_ref()
        .ok_or(DashboardError::MissingField("entity_type"))?;
    Ok((location, force_id))
}

fn sidc_for(update: &EntityStateUpdate) -> Sidc {
    match (update.sidc.as_deref(), update.entity_type.as_ref()) {
        (Some(raw), _) if !raw.trim().is_empty() => Sidc::parse(raw),
        (_, Some(entity_type)) => Sidc::for_entity_type(entity_type),
        _ => Sidc::parse("SUGP"),
    }
}

impl EntityDataPoint {
    pub fn new(update: EntityStateUpdate, factory: &mut ShapeFactory) -> DashboardResult<Self> {
        let (location, force_id) = validate(&update)?;
        let id = update.session_entity_id;
        let shape = factory.create_shape(&location, ClickTarget::Entity(id));
        Ok(Self {
            id,
            sidc: sidc_for(&update),
            symbol: MilitarySymbol::new(Affiliation::from_force_id(force_id)),
            state: update,
            assessment: None,
            has_been_erased: false,
            selection: Selection::toggleable(),
            shape,
            liveness: LivenessTimer::for_entities(),
        })
    }

    /// Replaces the reported state in place. Returns the role change, if any.
    pub fn set_state(&mut self, update: EntityStateUpdate) -> DashboardResult<Option<RoleChange>> {
        let (_, force_id) = validate(&update)?;
        self.liveness.cancel();
        let previous = self.role().map(str::to_string);
        self.symbol.affiliation = Affiliation::from_force_id(force_id);
        self.sidc = sidc_for(&update);
        self.state = update;
        let current = self.role().map(str::to_string);
        Ok((previous != current).then(|| RoleChange {
            entity: self.id,
            previous,
            current,
        }))
    }

    pub fn id(&self) -> SessionEntityIdentifier {
        self.id
    }

    pub fn state(&self) -> &EntityStateUpdate {
        &self.state
    }

    pub fn role(&self) -> Option<&str> {
        self.state.role()
    }

    pub fn location(&self) -> &Location {
        self.shape.location()
    }

    pub fn status(&self) -> SymbolStatus {
        self.symbol.status
    }

    pub fn assessment(&self) -> Option<AssessmentLevel> {
        self.assessment
    }

    pub fn apply_assessment(&mut self, assessment: Option<AssessmentLevel>) {
        self.assessment = assessment;
    }

    pub fn is_erased(&self) -> bool {
        self.has_been_erased
    }

    pub fn shape_tag(&self) -> &str {
        self.shape.tag()
    }

    /// Removes the shape from both maps. Later draws are no-ops.
    pub fn erase(&mut self) {
        if self.has_been_erased {
            return;
        }
        self.liveness.cancel();
        self.shape.erase();
        self.has_been_erased = true;
    }

    /// True when the entity stopped reporting for the whole liveness timeout.
    pub fn poll_liveness(&mut self, now_ms: u64) -> bool {
        !self.has_been_erased && self.liveness.poll(now_ms)
    }

    pub fn play_pulse_animation(&mut self) -> usize {
        self.shape.play_pulse_animation()
    }

    fn display_name(&self) -> Option<String> {
        let learner = self.state.learner_info.as_ref()?;
        Some(
            learner
                .username
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| learner.domain_session_id.to_string()),
        )
    }
}

impl MapDataPoint for EntityDataPoint {
    type DrawOutcome = Option<StatusChange>;

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    fn mappable_data(&self, ctx: &DrawContext<'_>) -> MappableData {
        let priority = if self.selection.selected {
            SELECTED_Z_INDEX
        } else if self.state.learner_info.is_some() {
            HAS_LEARNER_Z_INDEX
        } else {
            PLAYABLE_Z_INDEX
        };
        let name = if ctx.settings.show_team_org_name {
            self.display_name()
        } else {
            None
        };
        let sidc = self.sidc.with_symbol(&self.symbol);
        MappableData {
            location: self.state.location.unwrap_or(*self.shape.location()),
            name,
            icon_url: ctx.symbols.symbol_url(&sidc, ctx.settings.mil_symbol_scale),
            priority,
            data_label: self.role().map(str::to_string),
            selected: self.selection.selected,
        }
    }

    fn attribute_data(&self, attribute: &str) -> Option<String> {
        let state = &self.state;
        match attribute {
            "role" => self.role().map(str::to_string),
            "marking" => state.entity_marking.clone(),
            "force" => state.force_id.map(|force| force.to_string()),
            "affiliation" => Some(format!("{:?}", self.symbol.affiliation)),
            "sidc" => Some(self.sidc.with_symbol(&self.symbol).to_string()),
            "velocity" => state.velocity.map(|v| format!("{:.1} m/s", v.speed())),
            "orientation" => state
                .orientation
                .map(|o| format!("psi {:.2} theta {:.2} phi {:.2}", o.psi, o.theta, o.phi)),
            "damage" => Some(format!("{:?}", state.damage)),
            "posture" => Some(format!("{:?}", state.posture)),
            "learner" => self.display_name(),
            "location" => state
                .location
                .map(|l| format!("{:.5}, {:.5}, {:.1}", l.latitude, l.longitude, l.altitude)),
            "assessment" => self.assessment.map(|level| format!("{:?}", level)),
            "status" => Some(format!("{:?}", self.symbol.status)),
            _ => None,
        }
    }

    fn draw(&mut self, ctx: &DrawContext<'_>) -> Option<StatusChange> {
        if self.has_been_erased {
            return None;
        }
        self.liveness.cancel();

        let previous = self.symbol.status;
        self.symbol.status = SymbolStatus::for_entity(self.role().is_some(), self.assessment);
        let data = self.mappable_data(ctx);
        self.shape.draw(&data);

        let mut change = None;
        if previous != self.symbol.status {
            self.shape.play_pulse_animation();
            change = Some(StatusChange {
                session_id: self.id.host_domain_session_id,
                role: self.role().map(str::to_string),
                entity: Some(self.id),
                previous: Some(previous),
                current: self.symbol.status,
            });
        }

        self.liveness.arm(ctx.now_ms);
        change
    }
}
