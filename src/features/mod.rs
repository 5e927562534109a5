//! Feature engineering and preprocessing.
//!
//! Turns a validated parcel description into the exact numeric vector the
//! valuation model was trained on.

pub mod distance;
pub mod encoding;
pub mod engineering;
mod frame;
mod pipeline;
pub mod scaler;
pub mod schema;
mod transform;

pub use distance::haversine_km;
pub use encoding::{CategoricalEncoders, OneHotEncoder};
pub use engineering::{engineer, EngineeredFeatures};
pub use frame::{FeatureFrame, FeatureVector};
pub use pipeline::FeaturePipeline;
pub use scaler::StandardScaler;
pub use schema::{FEATURE_COUNT, SCALED_COLUMNS, SCHEMA_VERSION, TRAINING_COLUMNS};
pub use transform::apply_numeric_transforms;
