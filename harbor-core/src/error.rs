use snafu::{Location, Snafu};
use strum::Display;

use crate::Mmsi;

pub type Result<T> = std::result::Result<T, Error>;

/// Which end of a sample window synchronization was trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Boundary {
    Start,
    End,
}

#[derive(Debug, Snafu)]
#[snafu(module(harbor_error), visibility(pub))]
pub enum Error {
    #[snafu(display("Input document is not valid json"))]
    InvalidDocument {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Input document has no '{field}' array"))]
    MissingData {
        #[snafu(implicit)]
        location: Location,
        field: &'static str,
    },
    #[snafu(display("Record {index} contains unrecognized field '{field}'"))]
    Schema {
        #[snafu(implicit)]
        location: Location,
        index: usize,
        field: String,
    },
    #[snafu(display("Record {index} does not match the observation format"))]
    MalformedRecord {
        #[snafu(implicit)]
        location: Location,
        index: usize,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Record {index} has an unparseable timestamp '{value}'"))]
    TimestampParse {
        #[snafu(implicit)]
        location: Location,
        index: usize,
        value: String,
        #[snafu(source)]
        error: chrono::ParseError,
    },
    #[snafu(display("Vessel '{mmsi}' has no samples to synchronize"))]
    EmptyTrack {
        #[snafu(implicit)]
        location: Location,
        mmsi: Mmsi,
    },
    #[snafu(display(
        "Ran out of samples for vessel '{mmsi}' before the {boundary} timestamps converged"
    ))]
    WindowUnderflow {
        #[snafu(implicit)]
        location: Location,
        mmsi: Mmsi,
        boundary: Boundary,
    },
    #[snafu(display("Vessel '{mmsi}' does not exist in the dataset"))]
    UnknownVessel {
        #[snafu(implicit)]
        location: Location,
        mmsi: Mmsi,
    },
}
