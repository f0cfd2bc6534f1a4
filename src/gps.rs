use serde::{Deserialize, Serialize};

/// Latitude/longitude behind a field fix. Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// One reading from the field GPS: position in feet and a field bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub x: f64,
    pub y: f64,
    /// Degrees; anything outside (-180, 180) means no bearing
    pub bearing: f64,
    pub location: Option<GeoLocation>,
}

impl Fix {
    pub fn new(x: f64, y: f64, bearing: f64) -> Self {
        Self {
            x,
            y,
            bearing,
            location: None,
        }
    }
    /// Bearing if it is strictly inside (-180, 180).
    pub fn heading(&self) -> Option<f64> {
        valid_bearing(self.bearing)
    }
}

/// Sentinel the field GPS reports when it has no bearing.
pub const NO_HEADING: f64 = 360.0;

pub fn valid_bearing(bearing: f64) -> Option<f64> {
    (bearing > -180.0 && bearing < 180.0).then_some(bearing)
}

/// Receives fixes from the position source.
pub trait PositionListener {
    fn on_location_changed(&mut self, x: f64, y: f64, bearing: f64, location: Option<GeoLocation>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearing_bounds_are_exclusive() {
        assert_eq!(valid_bearing(179.9), Some(179.9));
        assert_eq!(valid_bearing(-179.9), Some(-179.9));
        assert_eq!(valid_bearing(0.0), Some(0.0));
        assert_eq!(valid_bearing(180.0), None);
        assert_eq!(valid_bearing(-180.0), None);
        assert_eq!(valid_bearing(NO_HEADING), None);
        assert_eq!(valid_bearing(f64::NAN), None);
    }

    #[test]
    fn fix_heading() {
        assert_eq!(Fix::new(1.0, 2.0, 45.0).heading(), Some(45.0));
        assert_eq!(Fix::new(1.0, 2.0, NO_HEADING).heading(), None);
    }
}
