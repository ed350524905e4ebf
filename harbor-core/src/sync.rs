use chrono::{DateTime, Duration, FixedOffset};
use tracing::trace;

use crate::{
    Boundary, DynamicSample, Mmsi, Result, VesselProfile,
    harbor_error::{EmptyTrackSnafu, WindowUnderflowSnafu},
};

pub fn default_sync_tolerance() -> Duration {
    Duration::minutes(2)
}

/// Two sample windows whose first and last timestamps are each within the
/// synchronization tolerance of each other.
///
/// Both windows are non-empty contiguous sub-slices of the profiles they
/// were built from and can only be constructed through [`synchronize`].
#[derive(Debug, Clone, Copy)]
pub struct SyncedPair<'a> {
    primary: &'a [DynamicSample],
    secondary: &'a [DynamicSample],
}

#[derive(Debug, Clone, Copy)]
struct Window<'a> {
    mmsi: Mmsi,
    samples: &'a [DynamicSample],
}

/// Trims the leading and trailing samples of two time sorted tracks until
/// their start and end timestamps are within `tolerance` of each other.
///
/// Interior samples are never touched and the profiles are not modified.
/// Both tracks must be sorted and non-empty, an empty track yields
/// [`crate::Error::EmptyTrack`].
pub fn synchronize<'a>(
    primary: &'a VesselProfile,
    secondary: &'a VesselProfile,
    tolerance: Duration,
) -> Result<SyncedPair<'a>> {
    let mut a = Window::new(primary)?;
    let mut b = Window::new(secondary)?;

    while let (Some(first_a), Some(first_b)) = (a.first(), b.first()) {
        if within(first_a, first_b, tolerance) {
            break;
        }
        if first_a < first_b {
            a.drop_first()?;
        } else {
            b.drop_first()?;
        }
    }

    while let (Some(last_a), Some(last_b)) = (a.last(), b.last()) {
        if within(last_a, last_b, tolerance) {
            break;
        }
        if last_a > last_b {
            a.drop_last()?;
        } else {
            b.drop_last()?;
        }
    }

    trace!(
        primary = %primary.mmsi,
        secondary = %secondary.mmsi,
        "synchronized windows of {} and {} samples",
        a.samples.len(),
        b.samples.len()
    );

    Ok(SyncedPair {
        primary: a.samples,
        secondary: b.samples,
    })
}

fn within(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>, tolerance: Duration) -> bool {
    (a - b).abs() <= tolerance
}

impl<'a> Window<'a> {
    fn new(profile: &'a VesselProfile) -> Result<Self> {
        if profile.samples.is_empty() {
            return EmptyTrackSnafu {
                mmsi: profile.mmsi,
            }
            .fail();
        }

        Ok(Self {
            mmsi: profile.mmsi,
            samples: &profile.samples,
        })
    }

    fn first(&self) -> Option<DateTime<FixedOffset>> {
        self.samples.first().map(|v| v.timestamp)
    }

    fn last(&self) -> Option<DateTime<FixedOffset>> {
        self.samples.last().map(|v| v.timestamp)
    }

    // A window is never trimmed down to nothing, the last remaining sample
    // failing to converge is an underflow.
    fn drop_first(&mut self) -> Result<()> {
        match self.samples.split_first() {
            Some((_, rest)) if !rest.is_empty() => {
                self.samples = rest;
                Ok(())
            }
            _ => WindowUnderflowSnafu {
                mmsi: self.mmsi,
                boundary: Boundary::Start,
            }
            .fail(),
        }
    }

    fn drop_last(&mut self) -> Result<()> {
        match self.samples.split_last() {
            Some((_, rest)) if !rest.is_empty() => {
                self.samples = rest;
                Ok(())
            }
            // Only reachable for unsorted tracks, sorted ones converge once the start has.
            _ => WindowUnderflowSnafu {
                mmsi: self.mmsi,
                boundary: Boundary::End,
            }
            .fail(),
        }
    }
}

impl<'a> SyncedPair<'a> {
    pub fn primary(&self) -> &'a [DynamicSample] {
        self.primary
    }

    pub fn secondary(&self) -> &'a [DynamicSample] {
        self.secondary
    }

    pub fn primary_start(&self) -> &DynamicSample {
        &self.primary[0]
    }

    pub fn secondary_start(&self) -> &DynamicSample {
        &self.secondary[0]
    }

    pub fn primary_end(&self) -> &DynamicSample {
        &self.primary[self.primary.len() - 1]
    }

    pub fn secondary_end(&self) -> &DynamicSample {
        &self.secondary[self.secondary.len() - 1]
    }

    pub fn start_distance_km(&self) -> f64 {
        self.primary_start()
            .location
            .distance_to(&self.secondary_start().location)
    }

    pub fn end_distance_km(&self) -> f64 {
        self.primary_end()
            .location
            .distance_to(&self.secondary_end().location)
    }
}
