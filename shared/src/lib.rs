//! Shared types and models for the Soil Health Advisory Platform
//!
//! This crate contains the scoring kernel and the types shared between the
//! backend, the form preview (via WASM), and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
