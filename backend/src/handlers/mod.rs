//! HTTP request handlers

pub mod documents;
pub mod health;
pub mod reports;
pub mod soil;

pub use documents::*;
pub use health::*;
pub use reports::*;
pub use soil::*;
