//! The feature pipeline: raw input to model-ready vector.

use std::sync::Arc;
use tracing::debug;

use super::encoding::CategoricalEncoders;
use super::engineering::{engineer, EngineeredFeatures};
use super::frame::{FeatureFrame, FeatureVector};
use super::scaler::StandardScaler;
use super::schema::{SCALED_COLUMNS, TRAINING_COLUMNS};
use super::transform::apply_numeric_transforms;
use crate::error::PipelineError;
use crate::models::{BorderSide, PredictionInput};
use crate::reference::ReferenceData;

/// Deterministic transform from [`PredictionInput`] to [`FeatureVector`].
///
/// Stages run in a fixed order: engineering, categorical encoding, numeric
/// transforms with scaling, then alignment to the training layout. The
/// scaler parameters are only valid for this order.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    reference: Arc<ReferenceData>,
    encoders: CategoricalEncoders,
    scaler: StandardScaler,
}

impl FeaturePipeline {
    /// Build a pipeline, checking the scaler against the scaled column set
    pub fn new(reference: Arc<ReferenceData>, scaler: StandardScaler) -> Result<Self, PipelineError> {
        scaler
            .expect_columns(&SCALED_COLUMNS)
            .map_err(PipelineError::ScalerMismatch)?;

        Ok(Self {
            reference,
            encoders: CategoricalEncoders::default(),
            scaler,
        })
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Run all stages
    pub fn transform(&self, input: &PredictionInput) -> Result<FeatureVector, PipelineError> {
        self.trace(input).map(|(_, vector)| vector)
    }

    /// Run all stages and also return the engineered intermediate features
    pub fn trace(
        &self,
        input: &PredictionInput,
    ) -> Result<(EngineeredFeatures, FeatureVector), PipelineError> {
        // Stage A
        let engineered = engineer(input, &self.reference);
        let mut frame = base_frame(input, &engineered);

        // Stage B
        frame.extend(self.encoders.encode(input, &engineered));

        // Stage C
        apply_numeric_transforms(&mut frame, &self.scaler);

        // Stage D
        let vector = align(&frame)?;
        Ok((engineered, vector))
    }
}

/// Numeric columns straight from the input and the engineering stage
fn base_frame(input: &PredictionInput, engineered: &EngineeredFeatures) -> FeatureFrame {
    let mut frame = FeatureFrame::new();
    frame.set("Area", input.area);
    for side in BorderSide::all() {
        frame.set(side.length_field(), input.length(*side));
    }
    frame.set("StreetWidth", input.street_width);
    frame.set("Latitude", input.latitude);
    frame.set("Longitude", input.longitude);
    frame.set_opt("distance_from_center_km", engineered.distance_from_center_km);
    frame.set("Perimeter", engineered.perimeter);
    frame.set("Street_Frontage", engineered.street_frontage);
    frame.set("Num_Street_Fronts", f64::from(engineered.num_street_fronts));
    frame.set_opt("Encoded_Hood", engineered.encoded_hood);
    frame.set_opt("Encoded_City", engineered.encoded_city);
    frame
}

/// Reindex to the training columns: absent columns are 0, extra columns are dropped
fn align(frame: &FeatureFrame) -> Result<FeatureVector, PipelineError> {
    let mut values = Vec::with_capacity(TRAINING_COLUMNS.len());
    for column in TRAINING_COLUMNS {
        let value = frame.get(column).unwrap_or(0.0);
        if !value.is_finite() {
            return Err(PipelineError::NonFinite { column });
        }
        values.push(value);
    }

    let dropped: Vec<&str> = frame
        .column_names()
        .into_iter()
        .filter(|c| !TRAINING_COLUMNS.contains(c))
        .collect();
    if !dropped.is_empty() {
        debug!("Dropped columns outside the training layout: {:?}", dropped);
    }

    Ok(FeatureVector::aligned(values))
}
