pub mod geo;

pub use geo::{GeoBounds, GeoHelper};
