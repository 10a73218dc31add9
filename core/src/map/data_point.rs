use crate::map::symbol::SymbolUrlGenerator;
use crate::messages::Location;
use crate::prelude::DisplaySettings;

/// Z-order for entities that may be played but have no human controller.
pub const PLAYABLE_Z_INDEX: i32 = 1;
/// Z-order for entities controlled by a learner.
pub const HAS_LEARNER_Z_INDEX: i32 = 2;
/// Z-order for the currently selected map item.
pub const SELECTED_Z_INDEX: i32 = 3;
/// Z-order for lines drawn between a shooter and its detonation.
pub const FIRE_LINE_Z_INDEX: i32 = 4;
/// Z-order for detonation markers, above everything else.
pub const DETONATION_Z_INDEX: i32 = 5;

/// Renderable snapshot of a data point's visual attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MappableData {
    pub location: Location,
    pub name: Option<String>,
    pub icon_url: String,
    pub priority: i32,
    pub data_label: Option<String>,
    pub selected: bool,
}

/// Selection flags shared by every map data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub selected: bool,
    /// When set, requesting the current state again inverts it (click-to-toggle).
    pub toggle_selected: bool,
}

impl Selection {
    pub fn toggleable() -> Self {
        Self {
            selected: false,
            toggle_selected: true,
        }
    }

    /// Applies a selection request and returns the state actually applied.
    pub fn apply(&mut self, requested: bool) -> bool {
        self.selected = if self.toggle_selected && requested == self.selected {
            !requested
        } else {
            requested
        };
        self.selected
    }
}

/// Everything a data point needs to turn its state into render calls.
#[derive(Clone, Copy)]
pub struct DrawContext<'a> {
    pub settings: &'a DisplaySettings,
    pub symbols: &'a SymbolUrlGenerator,
    pub now_ms: u64,
}

impl<'a> DrawContext<'a> {
    pub fn new(settings: &'a DisplaySettings, symbols: &'a SymbolUrlGenerator, now_ms: u64) -> Self {
        Self {
            settings,
            symbols,
            now_ms,
        }
    }
}

/// Contract for any item rendered on the session map.
pub trait MapDataPoint {
    type DrawOutcome;

    fn selection(&self) -> &Selection;

    fn selection_mut(&mut self) -> &mut Selection;

    /// Pure snapshot of what should currently be rendered.
    fn mappable_data(&self, ctx: &DrawContext<'_>) -> MappableData;

    /// Named attribute lookup. Unknown names and absent data both yield `None`.
    fn attribute_data(&self, attribute: &str) -> Option<String>;

    /// Pushes the current attributes to the render layer.
    fn draw(&mut self, ctx: &DrawContext<'_>) -> Self::DrawOutcome;

    fn is_selected(&self) -> bool {
        self.selection().selected
    }

    fn is_toggle_selected(&self) -> bool {
        self.selection().toggle_selected
    }

    fn set_toggle_selected(&mut self, toggle: bool) {
        self.selection_mut().toggle_selected = toggle;
    }

    /// Requests a selection state; returns the state applied after toggle semantics.
    fn set_selected(&mut self, selected: bool) -> bool {
        self.selection_mut().apply(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selection_inverts_repeated_request() {
        let mut selection = Selection::toggleable();
        assert!(selection.apply(true));
        assert!(!selection.apply(true));
        assert!(selection.apply(true));
    }

    #[test]
    fn plain_selection_is_idempotent() {
        let mut selection = Selection::default();
        assert!(selection.apply(true));
        assert!(selection.apply(true));
        assert!(!selection.apply(false));
        assert!(!selection.apply(false));
    }

    #[test]
    fn z_layers_are_strictly_ordered() {
        let layers = [
            PLAYABLE_Z_INDEX,
            HAS_LEARNER_Z_INDEX,
            SELECTED_Z_INDEX,
            FIRE_LINE_Z_INDEX,
            DETONATION_Z_INDEX,
        ];
        assert!(layers.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
