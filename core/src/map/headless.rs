use crate::map::render::{ClickTarget, LineHandle, MapSurface, PointHandle, VisualAttributes};
use crate::messages::Location;
use std::sync::{Arc, Mutex};

/// Recorded state of one point created on a [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub location: Location,
    pub z_index: i32,
    pub icon: String,
    pub click: Option<ClickTarget>,
    pub visuals: Option<VisualAttributes>,
    pub draws: usize,
    pub erases: usize,
    pub pulses: usize,
    pub rendered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub path: Vec<Location>,
    pub color: Option<String>,
    pub z_index: i32,
    pub draws: usize,
    pub erases: usize,
    pub rendered: bool,
}

#[derive(Debug, Default)]
struct HeadlessLog {
    points: Vec<PointRecord>,
    lines: Vec<LineRecord>,
}

/// In-memory render surface that records every primitive call.
///
/// Used by the simulator's offline mode and by tests; [`HeadlessSurface::probe`]
/// hands out a read view that stays valid after the surface is boxed away.
pub struct HeadlessSurface {
    name: String,
    log: Arc<Mutex<HeadlessLog>>,
}

impl HeadlessSurface {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::new(Mutex::new(HeadlessLog::default())),
        }
    }

    pub fn probe(&self) -> SurfaceProbe {
        SurfaceProbe {
            log: Arc::clone(&self.log),
        }
    }
}

impl MapSurface for HeadlessSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_point(&mut self, location: &Location) -> Box<dyn PointHandle> {
        let index = match self.log.lock() {
            Ok(mut log) => {
                log.points.push(PointRecord {
                    location: *location,
                    z_index: 0,
                    icon: String::new(),
                    click: None,
                    visuals: None,
                    draws: 0,
                    erases: 0,
                    pulses: 0,
                    rendered: false,
                });
                log.points.len() - 1
            }
            Err(_) => usize::MAX,
        };
        Box::new(HeadlessPoint {
            index,
            log: Arc::clone(&self.log),
        })
    }

    fn create_polyline(&mut self, path: &[Location]) -> Box<dyn LineHandle> {
        let index = match self.log.lock() {
            Ok(mut log) => {
                log.lines.push(LineRecord {
                    path: path.to_vec(),
                    color: None,
                    z_index: 0,
                    draws: 0,
                    erases: 0,
                    rendered: false,
                });
                log.lines.len() - 1
            }
            Err(_) => usize::MAX,
        };
        Box::new(HeadlessLine {
            index,
            log: Arc::clone(&self.log),
        })
    }
}

struct HeadlessPoint {
    index: usize,
    log: Arc<Mutex<HeadlessLog>>,
}

impl HeadlessPoint {
    fn with_record<R>(&self, apply: impl FnOnce(&mut PointRecord) -> R) -> Option<R> {
        let mut log = self.log.lock().ok()?;
        log.points.get_mut(self.index).map(apply)
    }
}

impl PointHandle for HeadlessPoint {
    fn set_location(&mut self, location: &Location) {
        self.with_record(|record| record.location = *location);
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.with_record(|record| record.z_index = z_index);
    }

    fn set_icon(&mut self, url: &str) {
        self.with_record(|record| record.icon = url.to_string());
    }

    fn set_click_target(&mut self, target: ClickTarget) {
        self.with_record(|record| record.click = Some(target));
    }

    fn draw(&mut self) {
        self.with_record(|record| {
            record.draws += 1;
            record.rendered = true;
        });
    }

    fn erase(&mut self) {
        self.with_record(|record| {
            record.erases += 1;
            record.rendered = false;
        });
    }

    fn apply_visuals(&mut self, visuals: &VisualAttributes) {
        self.with_record(|record| record.visuals = Some(visuals.clone()));
    }

    fn is_rendered(&self) -> bool {
        self.with_record(|record| record.rendered).unwrap_or(false)
    }

    fn play_pulse(&mut self) -> bool {
        self.with_record(|record| {
            if record.rendered {
                record.pulses += 1;
            }
            record.rendered
        })
        .unwrap_or(false)
    }
}

struct HeadlessLine {
    index: usize,
    log: Arc<Mutex<HeadlessLog>>,
}

impl HeadlessLine {
    fn with_record(&self, apply: impl FnOnce(&mut LineRecord)) {
        if let Ok(mut log) = self.log.lock() {
            if let Some(record) = log.lines.get_mut(self.index) {
                apply(record);
            }
        }
    }
}

impl LineHandle for HeadlessLine {
    fn set_color(&mut self, color: &str) {
        self.with_record(|record| record.color = Some(color.to_string()));
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.with_record(|record| record.z_index = z_index);
    }

    fn draw(&mut self) {
        self.with_record(|record| {
            record.draws += 1;
            record.rendered = true;
        });
    }

    fn erase(&mut self) {
        self.with_record(|record| {
            record.erases += 1;
            record.rendered = false;
        });
    }
}

/// Read-only view over what a [`HeadlessSurface`] has recorded.
#[derive(Clone)]
pub struct SurfaceProbe {
    log: Arc<Mutex<HeadlessLog>>,
}

impl SurfaceProbe {
    pub fn points(&self) -> Vec<PointRecord> {
        self.log
            .lock()
            .map(|log| log.points.clone())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<LineRecord> {
        self.log
            .lock()
            .map(|log| log.lines.clone())
            .unwrap_or_default()
    }

    pub fn rendered_point_count(&self) -> usize {
        self.points().iter().filter(|point| point.rendered).count()
    }

    pub fn total_pulses(&self) -> usize {
        self.points().iter().map(|point| point.pulses).sum()
    }

    /// Point whose icon carries the given uniqueness tag.
    pub fn point_tagged(&self, tag: &str) -> Option<PointRecord> {
        let suffix = format!("#{}", tag);
        self.points()
            .into_iter()
            .find(|point| point.icon.ends_with(&suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_point_lifecycle() {
        let mut surface = HeadlessSurface::new("main");
        let probe = surface.probe();
        let mut point = surface.create_point(&Location::new(1.0, 2.0, 0.0));
        assert!(!point.play_pulse());
        point.set_icon("sym.png#mapShape0");
        point.draw();
        assert!(point.is_rendered());
        assert!(point.play_pulse());
        point.erase();
        assert!(!point.play_pulse());

        let record = probe.point_tagged("mapShape0").unwrap();
        assert_eq!((record.draws, record.erases, record.pulses), (1, 1, 1));
        assert_eq!(probe.rendered_point_count(), 0);
    }

    #[test]
    fn records_polyline_color() {
        let mut surface = HeadlessSurface::new("main");
        let probe = surface.probe();
        let mut line = surface.create_polyline(&[
            Location::new(0.0, 0.0, 0.0),
            Location::new(1.0, 1.0, 0.0),
        ]);
        line.set_color("red");
        line.draw();
        let lines = probe.lines();
        assert_eq!(lines[0].color.as_deref(), Some("red"));
        assert!(lines[0].rendered);
        assert_eq!(lines[0].path.len(), 2);
    }
}
