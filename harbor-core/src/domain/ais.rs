use std::{fmt::Display, num::ParseIntError, str::FromStr};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::haversine_km;

/// Top level fields an observation record is allowed to contain.
pub const OBSERVATION_FIELDS: [&str; 3] = ["vessel", "navigation", "device"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(i32);

/// A position in decimal degrees.
///
/// No bounds are enforced, out of range values are kept as given. Both
/// coordinates must be json numbers, anything else fails the record as
/// [`crate::Error::MalformedRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoLocation {
    #[serde(rename = "long")]
    pub longitude: f64,
    #[serde(rename = "lat")]
    pub latitude: f64,
}

/// Identity attributes of a vessel as reported by a single observation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VesselIdentity {
    pub name: String,
    #[serde(rename = "type")]
    pub vessel_type: String,
    pub subtype: Option<String>,
    pub callsign: Option<String>,
    pub imo: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NavigationState {
    pub status: String,
    pub time: String,
    pub speed: Option<f64>,
    pub location: GeoLocation,
    pub course: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DeviceIdentity {
    pub mmsi: Mmsi,
}

/// An observation record exactly as it appears in the input document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawObservation {
    pub vessel: VesselIdentity,
    pub navigation: NavigationState,
    pub device: DeviceIdentity,
}

/// An observation that passed validation and had its timestamp parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub mmsi: Mmsi,
    pub vessel: VesselIdentity,
    pub sample: DynamicSample,
}

/// Navigation state of a vessel at a single point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicSample {
    pub status: String,
    pub timestamp: DateTime<FixedOffset>,
    pub speed: Option<f64>,
    pub location: GeoLocation,
    pub course: Option<f64>,
}

impl Mmsi {
    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl FromStr for Mmsi {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Mmsi> for i32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Great-circle distance in kilometers.
    pub fn distance_to(&self, other: &GeoLocation) -> f64 {
        haversine_km(self, other)
    }
}

impl Observation {
    pub fn new(raw: RawObservation, timestamp: DateTime<FixedOffset>) -> Self {
        let RawObservation {
            vessel,
            navigation,
            device,
        } = raw;

        let NavigationState {
            status,
            time: _,
            speed,
            location,
            course,
        } = navigation;

        Self {
            mmsi: device.mmsi,
            vessel,
            sample: DynamicSample {
                status,
                timestamp,
                speed,
                location,
                course,
            },
        }
    }
}

#[cfg(any(test, feature = "test"))]
mod test {
    use chrono::TimeZone;

    use super::*;

    impl Mmsi {
        pub fn test_new(mmsi: i32) -> Self {
            Self(mmsi)
        }
    }

    impl DynamicSample {
        pub fn test_new<T: TimeZone>(
            timestamp: DateTime<T>,
            latitude: f64,
            longitude: f64,
        ) -> Self {
            Self {
                status: "under-way-using-engine".to_string(),
                timestamp: timestamp.fixed_offset(),
                speed: Some(4.2),
                location: GeoLocation::new(latitude, longitude),
                course: Some(180.0),
            }
        }
    }
}
