use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{
    Mmsi, Result, VesselGroups, VesselLookup, VesselProfile, VesselRef,
    harbor_error::EmptyTrackSnafu, synchronize,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryTimes {
    pub primary: DateTime<FixedOffset>,
    pub secondary: DateTime<FixedOffset>,
}

/// Separation of two vessels at the boundaries of their synchronized windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    pub label: String,
    pub start_distance_km: f64,
    pub end_distance_km: f64,
    pub start: BoundaryTimes,
    pub end: BoundaryTimes,
    pub primary_samples: usize,
    pub secondary_samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairStatus {
    Synchronized(PairReport),
    Failed { reason: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairOutcome {
    pub primary: VesselRef,
    pub secondary: VesselRef,
    #[serde(flatten)]
    pub status: PairStatus,
}

/// Distance between the earliest known positions of two vessels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupDistance {
    pub from: VesselRef,
    pub to: VesselRef,
    pub distance_km: f64,
}

pub fn pair_label(primary: &VesselProfile, secondary: &VesselProfile) -> String {
    format!("{} <-> {}", primary.name, secondary.name)
}

/// Synchronizes the tracks of two vessels and measures their separation at
/// the start and end of the shared window.
pub fn pair_report(
    primary: &VesselProfile,
    secondary: &VesselProfile,
    tolerance: Duration,
) -> Result<PairReport> {
    let pair = synchronize(primary, secondary, tolerance)?;

    Ok(PairReport {
        label: pair_label(primary, secondary),
        start_distance_km: pair.start_distance_km(),
        end_distance_km: pair.end_distance_km(),
        start: BoundaryTimes {
            primary: pair.primary_start().timestamp,
            secondary: pair.secondary_start().timestamp,
        },
        end: BoundaryTimes {
            primary: pair.primary_end().timestamp,
            secondary: pair.secondary_end().timestamp,
        },
        primary_samples: pair.primary().len(),
        secondary_samples: pair.secondary().len(),
    })
}

/// Like [`pair_report`] but failures are captured in the outcome instead of
/// being returned, so one pair can never abort a batch.
pub fn evaluate_pair(
    primary: &VesselProfile,
    secondary: &VesselProfile,
    tolerance: Duration,
) -> PairOutcome {
    let status = match pair_report(primary, secondary, tolerance) {
        Ok(report) => PairStatus::Synchronized(report),
        Err(e) => {
            warn!(
                "failed to synchronize '{}': {e}",
                pair_label(primary, secondary)
            );
            PairStatus::Failed {
                reason: e.to_string(),
            }
        }
    };

    PairOutcome {
        primary: primary.vessel_ref(),
        secondary: secondary.vessel_ref(),
        status,
    }
}

/// Evaluates every (primary, secondary) combination sequentially.
#[instrument(skip_all, fields(app.num_pairs = groups.num_pairs()))]
pub fn pairwise_reports(groups: &VesselGroups, tolerance: Duration) -> Vec<PairOutcome> {
    groups
        .pairs()
        .map(|(p, s)| evaluate_pair(p, s, tolerance))
        .collect()
}

/// Measures the distance between the earliest positions of two vessels.
pub fn lookup_distance<L>(vessels: &L, from: Mmsi, to: Mmsi) -> Result<LookupDistance>
where
    L: VesselLookup,
{
    let from = vessels.vessel(from)?;
    let to = vessels.vessel(to)?;

    let from_sample = from
        .earliest_sample()
        .ok_or_else(|| EmptyTrackSnafu { mmsi: from.mmsi }.build())?;
    let to_sample = to
        .earliest_sample()
        .ok_or_else(|| EmptyTrackSnafu { mmsi: to.mmsi }.build())?;

    Ok(LookupDistance {
        from: from.vessel_ref(),
        to: to.vessel_ref(),
        distance_km: from_sample.location.distance_to(&to_sample.location),
    })
}

impl PairOutcome {
    pub fn cancelled(primary: &VesselProfile, secondary: &VesselProfile) -> Self {
        Self {
            primary: primary.vessel_ref(),
            secondary: secondary.vessel_ref(),
            status: PairStatus::Cancelled,
        }
    }

    pub fn report(&self) -> Option<&PairReport> {
        match &self.status {
            PairStatus::Synchronized(v) => Some(v),
            PairStatus::Failed { .. } | PairStatus::Cancelled => None,
        }
    }

    pub fn key(&self) -> (Mmsi, Mmsi) {
        (self.primary.mmsi, self.secondary.mmsi)
    }
}
