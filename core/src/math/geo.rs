use crate::messages::Location;

/// Axis-aligned latitude/longitude box enclosing a set of map points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn around(location: &Location) -> Self {
        Self {
            south: location.latitude,
            west: location.longitude,
            north: location.latitude,
            east: location.longitude,
        }
    }

    pub fn extend(&mut self, location: &Location) {
        self.south = self.south.min(location.latitude);
        self.north = self.north.max(location.latitude);
        self.west = self.west.min(location.longitude);
        self.east = self.east.max(location.longitude);
    }

    pub fn center(&self) -> Location {
        Location::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
            0.0,
        )
    }

    pub fn contains(&self, location: &Location) -> bool {
        (self.south..=self.north).contains(&location.latitude)
            && (self.west..=self.east).contains(&location.longitude)
    }
}

pub struct GeoHelper;

impl GeoHelper {
    /// Smallest bounds containing every location, or `None` for an empty set.
    pub fn bounds<'a, I>(locations: I) -> Option<GeoBounds>
    where
        I: IntoIterator<Item = &'a Location>,
    {
        let mut iter = locations.into_iter();
        let mut bounds = GeoBounds::around(iter.next()?);
        for location in iter {
            bounds.extend(location);
        }
        Some(bounds)
    }

    /// Arithmetic mean of the given locations (altitude included).
    pub fn centroid(locations: &[Location]) -> Option<Location> {
        if locations.is_empty() {
            return None;
        }
        let count = locations.len() as f64;
        let (lat, lon, alt) = locations.iter().fold((0.0, 0.0, 0.0), |acc, loc| {
            (acc.0 + loc.latitude, acc.1 + loc.longitude, acc.2 + loc.altitude)
        });
        Some(Location::new(lat / count, lon / count, alt / count))
    }
}
