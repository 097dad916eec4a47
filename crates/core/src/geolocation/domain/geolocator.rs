use std::fmt;

/// A resolved latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat, self.lon)
    }
}

/// Best-effort position lookup.
///
/// `None` is the "Unknown" sentinel: lookups degrade, they never fail
/// fatally, and no bounded latency is guaranteed. Callers invoke this at
/// most once per snapshot epoch, never per detection.
pub trait Geolocator: Send {
    fn locate(&mut self) -> Option<Coordinates>;
}

/// Geolocator that always reports an unknown position, for offline runs.
pub struct NullGeolocator;

impl Geolocator for NullGeolocator {
    fn locate(&mut self) -> Option<Coordinates> {
        None
    }
}
