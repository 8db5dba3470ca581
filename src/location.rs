//! Last-known-location lookup.
//!
//! The platform location service is an external collaborator; the engine only
//! ever needs a latitude/longitude pair, and tolerates not getting one.

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Source of the device's last known position.
pub trait LocationProvider: Send {
    /// The last known position, if any fix exists.
    fn last_known(&self) -> Option<GeoPoint>;
}

/// Provider that always reports the same position. Useful for replays and
/// tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    fn last_known(&self) -> Option<GeoPoint> {
        Some(self.0)
    }
}

/// Provider for devices without location services; never has a fix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn last_known(&self) -> Option<GeoPoint> {
        None
    }
}
