use serde::{Deserialize, Serialize};

/// Geodetic location of an entity or event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Simulation-scoped entity identifier (site / application / entity triple).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityIdentifier {
    pub site_id: u16,
    pub application_id: u16,
    pub entity_id: u16,
}

/// Identifies an entity within the knowledge session hosted by a domain session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionEntityIdentifier {
    pub host_domain_session_id: u32,
    pub entity: EntityIdentifier,
}

impl SessionEntityIdentifier {
    pub fn new(host_domain_session_id: u32, site_id: u16, application_id: u16, entity_id: u16) -> Self {
        Self {
            host_domain_session_id,
            entity: EntityIdentifier {
                site_id,
                application_id,
                entity_id,
            },
        }
    }
}

impl std::fmt::Display for SessionEntityIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}.{}.{}",
            self.host_domain_session_id,
            self.entity.site_id,
            self.entity.application_id,
            self.entity.entity_id
        )
    }
}

/// DIS-style entity type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub kind: u8,
    pub domain: u8,
    pub country: u16,
    pub category: u8,
    #[serde(default)]
    pub subcategory: u8,
    #[serde(default)]
    pub specific: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Velocity {
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Orientation {
    pub psi: f64,
    pub theta: f64,
    pub phi: f64,
}

/// The human learner controlling an entity, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerInfo {
    #[serde(default)]
    pub username: Option<String>,
    pub domain_session_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DamageState {
    #[default]
    Healthy,
    SlightDamage,
    ModerateDamage,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Unknown,
    Standing,
    Walking,
    Running,
    Kneeling,
    Prone,
    Crawling,
    Mounted,
}

fn default_active() -> bool {
    true
}

/// State of one entity reported by the session transport.
///
/// Location, force id and entity type are required by the map layer but are
/// optional on the wire so the rejection happens at the layer boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStateUpdate {
    pub session_entity_id: SessionEntityIdentifier,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub force_id: Option<u8>,
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    #[serde(default)]
    pub sidc: Option<String>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub velocity: Option<Velocity>,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub entity_marking: Option<String>,
    #[serde(default)]
    pub learner_info: Option<LearnerInfo>,
    #[serde(default)]
    pub damage: DamageState,
    #[serde(default)]
    pub posture: Posture,
    #[serde(default)]
    pub playable: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl EntityStateUpdate {
    /// Builds an active update carrying the fields the map layer requires.
    pub fn new(
        session_entity_id: SessionEntityIdentifier,
        location: Location,
        force_id: u8,
        entity_type: EntityType,
    ) -> Self {
        Self {
            session_entity_id,
            location: Some(location),
            force_id: Some(force_id),
            entity_type: Some(entity_type),
            sidc: None,
            role_name: None,
            velocity: None,
            orientation: None,
            entity_marking: None,
            learner_info: None,
            damage: DamageState::default(),
            posture: Posture::default(),
            playable: false,
            active: true,
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role_name = Some(role.to_string());
        self
    }

    pub fn with_learner(mut self, learner: LearnerInfo) -> Self {
        self.learner_info = Some(learner);
        self
    }

    /// Role name, treating blank names as unassigned.
    pub fn role(&self) -> Option<&str> {
        self.role_name
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetonationResult {
    EntityImpact,
    #[default]
    GroundImpact,
    AirBurst,
    None,
}

/// A munition detonation, optionally with the location of the firing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetonationUpdate {
    pub host_domain_session_id: u32,
    pub location: Location,
    #[serde(default)]
    pub firing_entity_location: Option<Location>,
    #[serde(default)]
    pub force_id: u8,
    #[serde(default)]
    pub detonation_result: DetonationResult,
}

/// Explicit request to remove an entity from the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveEntityMessage {
    pub session_entity_id: SessionEntityIdentifier,
}
