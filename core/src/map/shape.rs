use crate::map::data_point::MappableData;
use crate::map::render::{ClickTarget, LineHandle, MapSurface, PointHandle, VisualAttributes};
use crate::messages::Location;

/// Monotonic id source for shapes. Ids are never reused by one allocator.
#[derive(Debug, Default)]
pub struct ShapeIdAllocator {
    next: u64,
}

impl ShapeIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Creates paired main-map and minimap primitives for new shapes.
pub struct ShapeFactory {
    main: Box<dyn MapSurface>,
    minimap: Box<dyn MapSurface>,
    ids: ShapeIdAllocator,
}

impl ShapeFactory {
    pub fn new(main: Box<dyn MapSurface>, minimap: Box<dyn MapSurface>) -> Self {
        Self {
            main,
            minimap,
            ids: ShapeIdAllocator::new(),
        }
    }

    pub fn create_shape(&mut self, location: &Location, click: ClickTarget) -> MapShape {
        let id = self.ids.allocate();
        let mut map_point = self.main.create_point(location);
        let mut minimap_point = self.minimap.create_point(location);
        map_point.set_click_target(click);
        minimap_point.set_click_target(click);
        MapShape {
            id,
            tag: format!("mapShape{}", id),
            map_point,
            minimap_point,
            location: *location,
            fading: false,
        }
    }

    /// Fire lines only appear on the main map.
    pub fn create_line(&mut self, path: &[Location]) -> Box<dyn LineHandle> {
        self.main.create_polyline(path)
    }

    pub fn shapes_issued(&self) -> u64 {
        self.ids.issued()
    }
}

/// Owns the two render primitives for one data point.
pub struct MapShape {
    id: u64,
    tag: String,
    map_point: Box<dyn PointHandle>,
    minimap_point: Box<dyn PointHandle>,
    location: Location,
    fading: bool,
}

impl MapShape {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn draw(&mut self, data: &MappableData) {
        let icon = format!("{}#{}", data.icon_url, self.tag);
        for point in [&mut self.map_point, &mut self.minimap_point] {
            point.set_location(&data.location);
            point.set_z_index(data.priority);
            point.set_icon(&icon);
            point.draw();
        }
        self.location = data.location;

        let visuals = VisualAttributes {
            tag: self.tag.clone(),
            name: data.name.clone(),
            data_label: data.data_label.clone(),
            selected: data.selected,
            fading: self.fading,
        };
        self.map_point.apply_visuals(&visuals);
        self.minimap_point.apply_visuals(&visuals);
    }

    pub fn erase(&mut self) {
        self.map_point.erase();
        self.minimap_point.erase();
    }

    pub fn is_rendered(&self) -> bool {
        self.map_point.is_rendered() || self.minimap_point.is_rendered()
    }

    /// Pulses every currently rendered primitive; returns how many pulsed.
    pub fn play_pulse_animation(&mut self) -> usize {
        [&mut self.map_point, &mut self.minimap_point]
            .into_iter()
            .filter(|point| point.is_rendered())
            .map(|point| point.play_pulse())
            .filter(|pulsed| *pulsed)
            .count()
    }

    pub fn set_fading(&mut self, fading: bool) {
        self.fading = fading;
    }
}
