use std::io::Write;

use chrono::{DateTime, FixedOffset};
use harbor_core::{
    DynamicSample, IngestSummary, LookupDistance, PairOutcome, PairReport, PairStatus,
    VesselGroups, VesselProfile, VesselRef,
};
use serde::Serialize;

pub const HUMAN_TIMESTAMP_FORMAT: &str = "%A, %B %d, %Y - %I:%M %p";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitListing {
    pub category: String,
    pub primary: Vec<VesselRef>,
    pub secondary: Vec<VesselRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselTrack {
    pub vessel: VesselRef,
    pub samples: Vec<DynamicSample>,
}

/// Everything a single analysis run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: IngestSummary,
    pub split: SplitListing,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<VesselTrack>,
    pub lookup: Option<LookupDistance>,
    pub pairs: Vec<PairOutcome>,
}

impl From<&VesselGroups> for SplitListing {
    fn from(value: &VesselGroups) -> Self {
        Self {
            category: value.category.clone(),
            primary: value.primary_refs(),
            secondary: value.secondary_refs(),
        }
    }
}

impl From<&VesselProfile> for VesselTrack {
    fn from(value: &VesselProfile) -> Self {
        Self {
            vessel: value.vessel_ref(),
            samples: value.samples.clone(),
        }
    }
}

impl AnalysisReport {
    pub fn num_synchronized(&self) -> usize {
        self.pairs.iter().filter(|v| v.report().is_some()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.pairs
            .iter()
            .filter(|v| matches!(v.status, PairStatus::Failed { .. }))
            .count()
    }

    pub fn num_cancelled(&self) -> usize {
        self.pairs
            .iter()
            .filter(|v| v.status == PairStatus::Cancelled)
            .count()
    }
}

/// Formats in the offset the timestamp was reported with.
pub fn human_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(HUMAN_TIMESTAMP_FORMAT).to_string()
}

pub fn write_json<W: Write>(report: &AnalysisReport, out: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, report)
}

pub fn write_text<W: Write>(report: &AnalysisReport, out: &mut W) -> std::io::Result<()> {
    write_summary(&report.summary, out)?;
    write_split(&report.split, out)?;

    for track in &report.tracks {
        write_track(track, out)?;
    }

    if let Some(lookup) = &report.lookup {
        writeln!(
            out,
            "Distance between earliest positions of {} ({}) and {} ({}): {:.3} km\n",
            lookup.from.name, lookup.from.mmsi, lookup.to.name, lookup.to.mmsi, lookup.distance_km
        )?;
    }

    for outcome in &report.pairs {
        write_pair(outcome, out)?;
    }

    writeln!(
        out,
        "{} pairs: {} synchronized, {} failed, {} cancelled",
        report.pairs.len(),
        report.num_synchronized(),
        report.num_failed(),
        report.num_cancelled()
    )
}

fn write_summary<W: Write>(summary: &IngestSummary, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n-- Data Summary --")?;
    writeln!(out, "{:<25} {}", "Unique vessel names:", summary.vessel_names.join(", "))?;
    writeln!(out, "{:<25} {}", "Unique vessel types:", summary.vessel_types.join(", "))?;
    writeln!(out, "{:<25} {}", "Unique status:", summary.statuses.join(", "))?;
    writeln!(out, "{:<25} {}", "Observations:", summary.num_observations)?;
    writeln!(out, "{:<25} {}", "Total MMSIs:", summary.total_mmsis)?;
    writeln!(out, "{:<25} {}", "Duplicate MMSIs:", summary.duplicate_mmsis)?;
    writeln!(out, "-- end --\n")
}

fn write_split<W: Write>(split: &SplitListing, out: &mut W) -> std::io::Result<()> {
    let names = |vessels: &[VesselRef]| {
        vessels
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    writeln!(out, "-- Vessel Groups --")?;
    writeln!(out, "{:<25} {}", format!("{}:", split.category), names(&split.primary))?;
    writeln!(out, "{:<25} {}", "Others:", names(&split.secondary))?;
    writeln!(out, "-- end --\n")
}

fn write_track<W: Write>(track: &VesselTrack, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "VESSEL: {} ({})", track.vessel.name, track.vessel.mmsi)?;
    for sample in &track.samples {
        let speed = sample
            .speed
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<40} long/lat: {:<10} {:<15} speed: {:<5}",
            human_timestamp(&sample.timestamp),
            sample.location.longitude,
            sample.location.latitude,
            speed
        )?;
    }
    writeln!(out)
}

fn write_pair<W: Write>(outcome: &PairOutcome, out: &mut W) -> std::io::Result<()> {
    let PairOutcome {
        primary,
        secondary,
        status,
    } = outcome;

    match status {
        PairStatus::Synchronized(report) => write_pair_report(report, out),
        PairStatus::Failed { reason } => writeln!(
            out,
            "-- {} <-> {} --\nFailed: {reason}\n",
            primary.name, secondary.name
        ),
        PairStatus::Cancelled => writeln!(
            out,
            "-- {} <-> {} --\nCancelled\n",
            primary.name, secondary.name
        ),
    }
}

fn write_pair_report<W: Write>(report: &PairReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "-- {} --", report.label)?;
    writeln!(
        out,
        "{:<25} {:.3} km",
        "Start distance:", report.start_distance_km
    )?;
    writeln!(out, "{:<25} {:.3} km", "End distance:", report.end_distance_km)?;
    writeln!(
        out,
        "{:<25} {} / {}",
        "Start times:",
        human_timestamp(&report.start.primary),
        human_timestamp(&report.start.secondary)
    )?;
    writeln!(
        out,
        "{:<25} {} / {}",
        "End times:",
        human_timestamp(&report.end.primary),
        human_timestamp(&report.end.secondary)
    )?;
    writeln!(
        out,
        "{:<25} {} / {}\n",
        "Samples:", report.primary_samples, report.secondary_samples
    )
}
