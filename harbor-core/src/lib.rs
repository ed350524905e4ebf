#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Ingestion and proximity analysis of static AIS position reports.
//!
//! Observations are validated and grouped into per-vessel tracks, vessels are
//! split into two groups by type and every cross-group pair has its tracks
//! synchronized before measuring their separation.

mod distance;
mod domain;
mod error;
mod ingest;
mod pairwise;
mod sync;
mod timestamp;

pub use distance::*;
pub use domain::*;
pub use error::*;
pub use ingest::*;
pub use pairwise::*;
pub use sync::*;
pub use timestamp::*;
