use std::path::PathBuf;

use snafu::{Location, Snafu};
use tokio::task::JoinError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to load settings"))]
    Settings {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: config::ConfigError,
    },
    #[snafu(display("Synchronization tolerance is out of range"))]
    Tolerance {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: chrono::OutOfRangeError,
    },
    #[snafu(display("Failed to read input document '{}'", path.display()))]
    ReadInput {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Failed to ingest input document"))]
    Ingest {
        #[snafu(implicit)]
        location: Location,
        source: harbor_core::Error,
    },
    #[snafu(display("Failed to look up vessel distance"))]
    Lookup {
        #[snafu(implicit)]
        location: Location,
        source: harbor_core::Error,
    },
    #[snafu(display("Failed to join pair worker"))]
    Join {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: JoinError,
    },
    #[snafu(display("Failed to write report"))]
    Write {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Failed to serialize report"))]
    Serialize {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
}
