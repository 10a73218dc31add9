use crate::messages::{Location, SessionEntityIdentifier};

/// Visual metadata applied to a rendered node after it has been drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualAttributes {
    /// Uniqueness tag used to locate the rendered node later.
    pub tag: String,
    pub name: Option<String>,
    pub data_label: Option<String>,
    pub selected: bool,
    pub fading: bool,
}

/// What a click on a rendered point should select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Entity(SessionEntityIdentifier),
    Detonation(u64),
}

/// Opaque handle to one point primitive owned by a render surface.
pub trait PointHandle: Send {
    fn set_location(&mut self, location: &Location);

    fn set_z_index(&mut self, z_index: i32);

    fn set_icon(&mut self, url: &str);

    fn set_click_target(&mut self, target: ClickTarget);

    fn draw(&mut self);

    fn erase(&mut self);

    fn apply_visuals(&mut self, visuals: &VisualAttributes);

    /// Whether the point is currently rendered (drawn, not erased, on screen).
    fn is_rendered(&self) -> bool;

    /// Plays a transient highlight. Returns `false` if nothing is rendered.
    fn play_pulse(&mut self) -> bool;
}

pub trait LineHandle: Send {
    fn set_color(&mut self, color: &str);

    fn set_z_index(&mut self, z_index: i32);

    fn draw(&mut self);

    fn erase(&mut self);
}

/// Map rendering collaborator. Implementations own the actual drawing backend.
pub trait MapSurface: Send {
    fn name(&self) -> &str;

    fn create_point(&mut self, location: &Location) -> Box<dyn PointHandle>;

    fn create_polyline(&mut self, path: &[Location]) -> Box<dyn LineHandle>;
}
