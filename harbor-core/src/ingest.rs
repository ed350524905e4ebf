use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::ResultExt;
use tracing::{info, instrument};

use crate::{
    Fleet, Mmsi, OBSERVATION_FIELDS, Observation, RawObservation, Result,
    harbor_error::{
        InvalidDocumentSnafu, MalformedRecordSnafu, MissingDataSnafu, SchemaSnafu,
        TimestampParseSnafu,
    },
    parse_timestamp,
};

/// Name of the top level field holding the observation records.
pub const DOCUMENT_DATA_FIELD: &str = "data";

/// Distinct values seen while validating a batch of observations.
///
/// All lists are in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub vessel_names: Vec<String>,
    pub vessel_types: Vec<String>,
    pub statuses: Vec<String>,
    pub num_observations: usize,
    pub total_mmsis: usize,
    /// Observations whose mmsi had already been seen earlier in the batch.
    pub duplicate_mmsis: usize,
}

#[derive(Debug, Clone)]
pub struct ValidatedBatch {
    pub observations: Vec<Observation>,
    pub summary: IngestSummary,
}

/// A fully ingested document with every vessel track sorted by time.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub summary: IngestSummary,
    pub fleet: Fleet,
}

#[derive(Deserialize)]
struct Document {
    data: Option<Vec<Value>>,
}

/// Extracts the raw observation records from the wrapper object.
pub fn parse_document(input: &str) -> Result<Vec<Value>> {
    let document: Document = serde_json::from_str(input).context(InvalidDocumentSnafu)?;

    document.data.ok_or_else(|| {
        MissingDataSnafu {
            field: DOCUMENT_DATA_FIELD,
        }
        .build()
    })
}

/// Validates every record before anything is aggregated, the first invalid
/// record fails the whole batch.
#[instrument(skip_all, fields(app.num_records = records.len()))]
pub fn validate_records(records: Vec<Value>) -> Result<ValidatedBatch> {
    let mut observations = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();
    let mut duplicate_mmsis = 0;

    for (index, record) in records.into_iter().enumerate() {
        let observation = validate_record(index, record)?;

        if !seen.insert(observation.mmsi) {
            duplicate_mmsis += 1;
        }

        observations.push(observation);
    }

    let summary = IngestSummary {
        vessel_names: distinct(&observations, |o| &o.vessel.name),
        vessel_types: distinct(&observations, |o| &o.vessel.vessel_type),
        statuses: distinct(&observations, |o| &o.sample.status),
        num_observations: observations.len(),
        total_mmsis: seen.len(),
        duplicate_mmsis,
    };

    Ok(ValidatedBatch {
        observations,
        summary,
    })
}

fn validate_record(index: usize, record: Value) -> Result<Observation> {
    let record: Map<String, Value> =
        serde_json::from_value(record).context(MalformedRecordSnafu { index })?;

    if let Some(field) = record
        .keys()
        .find(|k| !OBSERVATION_FIELDS.contains(&k.as_str()))
    {
        return SchemaSnafu {
            index,
            field: field.clone(),
        }
        .fail();
    }

    let raw: RawObservation =
        serde_json::from_value(Value::Object(record)).context(MalformedRecordSnafu { index })?;

    let timestamp = parse_timestamp(&raw.navigation.time).context(TimestampParseSnafu {
        index,
        value: raw.navigation.time.clone(),
    })?;

    Ok(Observation::new(raw, timestamp))
}

fn distinct<F>(observations: &[Observation], key: F) -> Vec<String>
where
    F: Fn(&Observation) -> &String,
{
    observations.iter().map(key).unique().cloned().collect()
}

/// Validates, aggregates and sorts an input document.
pub fn ingest(input: &str) -> Result<Dataset> {
    let records = parse_document(input)?;
    let ValidatedBatch {
        observations,
        summary,
    } = validate_records(records)?;

    let mut fleet = Fleet::from_observations(observations);
    fleet.sort_tracks();

    info!(
        "ingested {} observations from {} vessels, {} duplicate mmsis",
        summary.num_observations,
        fleet.len(),
        summary.duplicate_mmsis
    );

    Ok(Dataset { summary, fleet })
}

impl Dataset {
    pub fn mmsis(&self) -> impl Iterator<Item = Mmsi> {
        self.fleet.iter().map(|v| v.mmsi)
    }
}
