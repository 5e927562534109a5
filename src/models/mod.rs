//! Core data models for the valuation service.

pub mod border;
pub mod category;
pub mod input;

pub use border::{classify_border, BorderSide, BorderType, BORDER_KEYWORDS};
pub use category::{ASSET_LEVELS, ASSET_TYPES, REGION_VOCABULARY, VALID_REGIONS};
pub use input::{PredictionInput, PredictionResponse};
