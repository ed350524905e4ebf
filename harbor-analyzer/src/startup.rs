use std::io::Write;

use chrono::Duration;
use harbor_core::{Dataset, ingest, lookup_distance};
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{
    error::{
        Result,
        error::{
            IngestSnafu, LookupSnafu, ReadInputSnafu, SerializeSnafu, ToleranceSnafu, WriteSnafu,
        },
    },
    report::{AnalysisReport, SplitListing, VesselTrack, write_json, write_text},
    scheduler::PairScheduler,
    settings::{OutputFormat, Settings},
};

pub struct App {
    settings: Settings,
    tolerance: Duration,
    cancellation: CancellationToken,
}

impl App {
    pub fn build(settings: Settings) -> Result<Self> {
        let tolerance = settings.sync_tolerance().context(ToleranceSnafu)?;

        Ok(Self {
            settings,
            tolerance,
            cancellation: CancellationToken::new(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Cancelling the returned token stops pair evaluation, pairs that have
    /// not been started yet are reported as cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub async fn run(&self) -> Result<AnalysisReport> {
        let path = &self.settings.input_path;
        let document = tokio::fs::read_to_string(path)
            .await
            .context(ReadInputSnafu { path: path.clone() })?;

        self.analyze(&document).await
    }

    #[instrument(skip_all, fields(app.primary_category = %self.settings.primary_category))]
    pub async fn analyze(&self, document: &str) -> Result<AnalysisReport> {
        let Dataset { summary, fleet } = ingest(document).context(IngestSnafu)?;

        let tracks = if self.settings.show_tracks {
            fleet.iter().map(VesselTrack::from).collect()
        } else {
            vec![]
        };

        let lookup = self
            .settings
            .lookup
            .map(|v| lookup_distance(&fleet, v.from, v.to))
            .transpose()
            .context(LookupSnafu)?;

        let groups = fleet.split_by_type(&self.settings.primary_category);
        let split = SplitListing::from(&groups);

        let scheduler = PairScheduler::new(
            self.settings.num_workers(),
            self.tolerance,
            self.cancellation.clone(),
        );
        let pairs = scheduler.run(&groups).await?;

        info!(
            "evaluated {} pairs between {} '{}' vessels and {} others",
            pairs.len(),
            split.primary.len(),
            split.category,
            split.secondary.len()
        );

        Ok(AnalysisReport {
            summary,
            split,
            tracks,
            lookup,
            pairs,
        })
    }

    pub fn render<W: Write>(&self, report: &AnalysisReport, mut out: W) -> Result<()> {
        match self.settings.output {
            OutputFormat::Text => write_text(report, &mut out).context(WriteSnafu),
            OutputFormat::Json => {
                write_json(report, &mut out).context(SerializeSnafu)?;
                writeln!(out).context(WriteSnafu)
            }
        }
    }
}
