use crate::messages::EntityType;
use crate::prelude::AssessmentLevel;

/// Base icon size in pixels before the user's display scale is applied.
pub const DEFAULT_SYMBOL_SIZE: f64 = 35.0;

const SIDC_LENGTH: usize = 15;
const AFFILIATION_INDEX: usize = 1;
const STATUS_INDEX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affiliation {
    Friend,
    Hostile,
    Neutral,
    Unknown,
}

impl Affiliation {
    pub fn from_force_id(force_id: u8) -> Self {
        match force_id {
            1 => Affiliation::Friend,
            2 => Affiliation::Hostile,
            3 => Affiliation::Neutral,
            _ => Affiliation::Unknown,
        }
    }

    pub fn sidc_code(self) -> char {
        match self {
            Affiliation::Friend => 'F',
            Affiliation::Hostile => 'H',
            Affiliation::Neutral => 'N',
            Affiliation::Unknown => 'U',
        }
    }

    pub fn fire_line_color(self) -> &'static str {
        match self {
            Affiliation::Friend => "blue",
            Affiliation::Hostile => "red",
            Affiliation::Neutral => "lightgreen",
            Affiliation::Unknown => "yellow",
        }
    }
}

/// Operational status shown on a military symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SymbolStatus {
    #[default]
    Present,
    PresentFullyCapable,
    PresentDamaged,
    PresentDestroyed,
    PresentFullToCapacity,
}

impl SymbolStatus {
    /// Status shown for an entity. Unassigned roles always show `Present`.
    pub fn for_entity(has_role: bool, assessment: Option<AssessmentLevel>) -> Self {
        if !has_role {
            return SymbolStatus::Present;
        }
        match assessment {
            Some(AssessmentLevel::BelowExpectation) => SymbolStatus::PresentDestroyed,
            Some(AssessmentLevel::AtExpectation) => SymbolStatus::PresentFullyCapable,
            Some(AssessmentLevel::AboveExpectation) => SymbolStatus::PresentFullToCapacity,
            Some(AssessmentLevel::Unknown) | None => SymbolStatus::Present,
        }
    }

    pub fn sidc_code(self) -> char {
        match self {
            SymbolStatus::Present => 'P',
            SymbolStatus::PresentFullyCapable => 'C',
            SymbolStatus::PresentDamaged => 'D',
            SymbolStatus::PresentDestroyed => 'X',
            SymbolStatus::PresentFullToCapacity => 'F',
        }
    }

    pub fn needs_attention(self) -> bool {
        self == SymbolStatus::PresentDestroyed
    }
}

/// Fixed-width symbol identification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidc {
    code: [char; SIDC_LENGTH],
}

impl Sidc {
    pub fn parse(raw: &str) -> Self {
        let mut code = ['-'; SIDC_LENGTH];
        for (slot, ch) in code.iter_mut().zip(raw.trim().chars()) {
            *slot = ch.to_ascii_uppercase();
        }
        Self { code }
    }

    /// Fallback code derived from the entity's DIS kind and domain.
    pub fn for_entity_type(entity_type: &EntityType) -> Self {
        let base = match (entity_type.kind, entity_type.domain) {
            (3, _) => "SUGPUCI",
            (_, 2) => "SUAP",
            (_, 3) => "SUSP",
            (_, 4) => "SUUP",
            _ => "SUGP",
        };
        Self::parse(base)
    }

    pub fn with_symbol(&self, symbol: &MilitarySymbol) -> Self {
        let mut code = self.code;
        code[AFFILIATION_INDEX] = symbol.affiliation.sidc_code();
        code[STATUS_INDEX] = symbol.status.sidc_code();
        Self { code }
    }
}

impl std::fmt::Display for Sidc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.code.iter().try_for_each(|ch| write!(f, "{}", ch))
    }
}

/// Visual identity of an entity's map icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilitarySymbol {
    pub affiliation: Affiliation,
    pub status: SymbolStatus,
}

impl MilitarySymbol {
    pub fn new(affiliation: Affiliation) -> Self {
        Self {
            affiliation,
            status: SymbolStatus::Present,
        }
    }
}

/// Builds icon URLs for symbols and detonation markers.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolUrlGenerator {
    base_url: String,
}

impl SymbolUrlGenerator {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn icon_size(scale: f64) -> u32 {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        (DEFAULT_SYMBOL_SIZE * scale).round() as u32
    }

    pub fn symbol_url(&self, sidc: &Sidc, scale: f64) -> String {
        format!("{}/{}.png?size={}", self.base_url, sidc, Self::icon_size(scale))
    }

    pub fn detonation_url(&self, entity_impact: bool, scale: f64) -> String {
        let color = if entity_impact { "yellow" } else { "999999" };
        format!(
            "{}/detonation.png?color={}&size={}",
            self.base_url,
            color,
            Self::icon_size(scale)
        )
    }
}

impl Default for SymbolUrlGenerator {
    fn default() -> Self {
        Self::new("symbols")
    }
}
