//! Infath - land parcel valuation for Saudi Arabia
//!
//! Validates a parcel description, turns it into the fixed feature layout the
//! valuation model was trained on, and serves predictions over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod inference;
pub mod models;
pub mod reference;
pub mod validation;

pub use error::PredictError;
pub use inference::Predictor;
pub use models::{PredictionInput, PredictionResponse};
