#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Command line front end running the proximity analysis over an AIS document.

pub mod error;
pub mod report;
pub mod scheduler;
pub mod settings;
pub mod startup;
