//! Domain models for the Soil Health Advisory Platform

mod advisory;
mod report;
mod soil;

pub use advisory::*;
pub use report::*;
pub use soil::*;
