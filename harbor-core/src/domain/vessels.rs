use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tracing::debug;

use crate::{DynamicSample, Mmsi, Observation, Result, harbor_error::UnknownVesselSnafu};

/// All observations of a single transponder.
///
/// Static attributes are taken from the first observation seen for the
/// mmsi, later observations only contribute to `samples`.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselProfile {
    pub mmsi: Mmsi,
    pub name: String,
    pub vessel_type: String,
    pub subtype: Option<String>,
    pub callsign: Option<String>,
    pub imo: Option<i64>,
    pub samples: Vec<DynamicSample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VesselRef {
    pub mmsi: Mmsi,
    pub name: String,
}

/// Vessels keyed by mmsi, built from a validated observation batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    vessels: BTreeMap<Mmsi, VesselProfile>,
}

/// The fleet partitioned into the vessels matching a category and everything else.
///
/// Both groups are keyed by mmsi, vessels sharing a name are therefore kept apart.
#[derive(Debug, Clone, Default)]
pub struct VesselGroups {
    pub category: String,
    pub primary: BTreeMap<Mmsi, Arc<VesselProfile>>,
    pub secondary: BTreeMap<Mmsi, Arc<VesselProfile>>,
}

pub trait VesselLookup {
    fn vessel(&self, mmsi: Mmsi) -> Result<&VesselProfile>;
}

/// Sorts samples by ascending timestamp, samples with equal timestamps keep
/// their relative order.
pub fn sort_by_time(samples: &mut [DynamicSample]) {
    samples.sort_by_key(|v| v.timestamp);
}

impl VesselProfile {
    fn from_first_observation(observation: Observation) -> Self {
        let Observation {
            mmsi,
            vessel,
            sample,
        } = observation;

        Self {
            mmsi,
            name: vessel.name,
            vessel_type: vessel.vessel_type,
            subtype: vessel.subtype,
            callsign: vessel.callsign,
            imo: vessel.imo,
            samples: vec![sample],
        }
    }

    pub fn vessel_ref(&self) -> VesselRef {
        VesselRef {
            mmsi: self.mmsi,
            name: self.name.clone(),
        }
    }

    pub fn sort_samples(&mut self) {
        sort_by_time(&mut self.samples);
    }

    pub fn is_sorted(&self) -> bool {
        self.samples.is_sorted_by_key(|v| v.timestamp)
    }

    pub fn earliest_sample(&self) -> Option<&DynamicSample> {
        self.samples.first()
    }

    pub fn latest_sample(&self) -> Option<&DynamicSample> {
        self.samples.last()
    }
}

impl Fleet {
    /// Groups observations by mmsi in input order, the first observation of
    /// each mmsi decides its static attributes.
    pub fn from_observations<T>(observations: T) -> Self
    where
        T: IntoIterator<Item = Observation>,
    {
        let mut vessels: BTreeMap<Mmsi, VesselProfile> = BTreeMap::new();

        for observation in observations {
            match vessels.get_mut(&observation.mmsi) {
                Some(profile) => profile.samples.push(observation.sample),
                None => {
                    vessels.insert(
                        observation.mmsi,
                        VesselProfile::from_first_observation(observation),
                    );
                }
            }
        }

        debug!("aggregated {} vessels", vessels.len());

        Self { vessels }
    }

    pub fn sort_tracks(&mut self) {
        self.vessels
            .values_mut()
            .for_each(VesselProfile::sort_samples);
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VesselProfile> {
        self.vessels.values()
    }

    pub fn split<F>(self, category: impl Into<String>, is_primary: F) -> VesselGroups
    where
        F: Fn(&VesselProfile) -> bool,
    {
        let mut groups = VesselGroups {
            category: category.into(),
            ..Default::default()
        };

        for (mmsi, profile) in self.vessels {
            if is_primary(&profile) {
                groups.primary.insert(mmsi, Arc::new(profile));
            } else {
                groups.secondary.insert(mmsi, Arc::new(profile));
            }
        }

        debug!(
            "split fleet on '{}': {} primary, {} secondary",
            groups.category,
            groups.primary.len(),
            groups.secondary.len()
        );

        groups
    }

    /// Splits on exact equality between the vessel type and `category`.
    pub fn split_by_type(self, category: &str) -> VesselGroups {
        self.split(category, |v| v.vessel_type == category)
    }
}

impl VesselLookup for Fleet {
    fn vessel(&self, mmsi: Mmsi) -> Result<&VesselProfile> {
        self.vessels
            .get(&mmsi)
            .ok_or_else(|| UnknownVesselSnafu { mmsi }.build())
    }
}

impl VesselGroups {
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    pub fn num_pairs(&self) -> usize {
        self.primary.len() * self.secondary.len()
    }

    pub fn primary_refs(&self) -> Vec<VesselRef> {
        self.primary.values().map(|v| v.vessel_ref()).collect()
    }

    pub fn secondary_refs(&self) -> Vec<VesselRef> {
        self.secondary.values().map(|v| v.vessel_ref()).collect()
    }

    /// Every (primary, secondary) combination, primary vessels in the outer loop.
    pub fn pairs(&self) -> impl Iterator<Item = (&Arc<VesselProfile>, &Arc<VesselProfile>)> {
        self.primary
            .values()
            .flat_map(move |p| self.secondary.values().map(move |s| (p, s)))
    }
}

impl VesselLookup for VesselGroups {
    fn vessel(&self, mmsi: Mmsi) -> Result<&VesselProfile> {
        self.primary
            .get(&mmsi)
            .or_else(|| self.secondary.get(&mmsi))
            .map(|v| v.as_ref())
            .ok_or_else(|| UnknownVesselSnafu { mmsi }.build())
    }
}

#[cfg(any(test, feature = "test"))]
mod test {
    use super::*;

    impl VesselProfile {
        pub fn test_new(
            mmsi: i32,
            name: &str,
            vessel_type: &str,
            samples: Vec<DynamicSample>,
        ) -> Self {
            Self {
                mmsi: Mmsi::test_new(mmsi),
                name: name.to_string(),
                vessel_type: vessel_type.to_string(),
                subtype: None,
                callsign: Some(format!("CS{mmsi}")),
                imo: None,
                samples,
            }
        }
    }

    impl Fleet {
        pub fn test_new(vessels: Vec<VesselProfile>) -> Self {
            Self {
                vessels: vessels.into_iter().map(|v| (v.mmsi, v)).collect(),
            }
        }
    }
}
