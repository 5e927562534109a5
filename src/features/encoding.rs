//! One-hot encoding over fixed category vocabularies.

use super::engineering::EngineeredFeatures;
use crate::models::{
    BorderSide, BorderType, PredictionInput, ASSET_LEVELS, ASSET_TYPES, REGION_VOCABULARY,
};

/// One-hot encoder with a vocabulary fixed at construction.
///
/// Values outside the vocabulary encode to an all-zero row.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    column: &'static str,
    categories: Vec<&'static str>,
}

impl OneHotEncoder {
    /// Build an encoder; categories are kept in sorted order
    pub fn new(column: &'static str, vocabulary: &[&'static str]) -> Self {
        let mut categories = vocabulary.to_vec();
        categories.sort_unstable();
        categories.dedup();
        Self { column, categories }
    }

    pub fn categories(&self) -> &[&'static str] {
        &self.categories
    }

    /// Encode one value into named indicator columns
    pub fn encode(&self, value: &str) -> Vec<(String, f64)> {
        self.categories
            .iter()
            .map(|cat| {
                let hit = if *cat == value { 1.0 } else { 0.0 };
                (format!("{}_{}", self.column, cat), hit)
            })
            .collect()
    }
}

/// The categorical columns the model consumes. The city is deliberately
/// absent: it only reaches the model through its numeric encoding.
#[derive(Debug, Clone)]
pub struct CategoricalEncoders {
    region: OneHotEncoder,
    asset_type: OneHotEncoder,
    borders: [OneHotEncoder; 4],
    asset_level: OneHotEncoder,
}

impl Default for CategoricalEncoders {
    fn default() -> Self {
        let sides = BorderSide::all();
        let border = |i: usize| OneHotEncoder::new(sides[i].type_field(), BorderType::vocabulary());
        Self {
            region: OneHotEncoder::new("PropAssetRegionName", REGION_VOCABULARY),
            asset_type: OneHotEncoder::new("EvaluationAssetTypeName", ASSET_TYPES),
            borders: [border(0), border(1), border(2), border(3)],
            asset_level: OneHotEncoder::new("AssetLevelId", ASSET_LEVELS),
        }
    }
}

impl CategoricalEncoders {
    /// Encode every categorical column of one input
    pub fn encode(&self, input: &PredictionInput, engineered: &EngineeredFeatures) -> Vec<(String, f64)> {
        let mut out = Vec::new();
        out.extend(self.region.encode(&input.region));
        out.extend(self.asset_type.encode(&input.asset_type));
        for (encoder, border_type) in self.borders.iter().zip(engineered.border_types.iter()) {
            out.extend(encoder.encode(border_type.as_str()));
        }
        out.extend(self.asset_level.encode(&input.asset_level));
        out
    }
}
