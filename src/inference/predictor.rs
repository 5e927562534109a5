//! End-to-end prediction: validation, feature pipeline, model and post-processing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::model::{GradientBoostedTrees, Regressor};
use crate::error::{ArtifactError, PredictError};
use crate::features::{EngineeredFeatures, FeaturePipeline, FeatureVector, StandardScaler};
use crate::models::PredictionInput;
use crate::reference::{ReferenceData, ReferencePaths};
use crate::validation::{validate, ValidatedInput};

/// Everything loaded at startup
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub feature_scaler: PathBuf,
    /// Optional: a missing file disables inverse target scaling
    pub target_scaler: PathBuf,
    pub reference: ReferencePaths,
}

/// Full trace of one prediction, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub input: PredictionInput,
    /// Original city when the region capital was substituted
    pub substituted_city: Option<String>,
    pub engineered: EngineeredFeatures,
    pub features: FeatureVector,
    pub raw_output: f64,
    pub prediction: f64,
}

/// Valuation model together with its preprocessing
pub struct Predictor {
    pipeline: FeaturePipeline,
    model: Box<dyn Regressor>,
    target_scaler: Option<StandardScaler>,
}

impl Predictor {
    pub fn new(
        pipeline: FeaturePipeline,
        model: Box<dyn Regressor>,
        target_scaler: Option<StandardScaler>,
    ) -> Self {
        Self {
            pipeline,
            model,
            target_scaler,
        }
    }

    /// Load reference tables, scalers and the model. Any required artifact
    /// failing to load is fatal.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let reference =
            ReferenceData::load(&paths.reference).context("Failed to load reference data")?;

        let feature_scaler = StandardScaler::load(&paths.feature_scaler)
            .context("Failed to load feature scaler")?;
        let pipeline = FeaturePipeline::new(Arc::new(reference), feature_scaler)
            .context("Feature scaler does not fit the pipeline")?;

        let target_scaler = load_optional_scaler(&paths.target_scaler)
            .context("Failed to load target scaler")?;

        let model = GradientBoostedTrees::load(&paths.model).context("Failed to load model")?;

        Ok(Self::new(pipeline, Box::new(model), target_scaler))
    }

    pub fn reference(&self) -> &ReferenceData {
        self.pipeline.reference()
    }

    pub fn has_target_scaler(&self) -> bool {
        self.target_scaler.is_some()
    }

    /// Validate an input and predict its value
    pub fn predict(&self, input: &PredictionInput) -> Result<f64, PredictError> {
        let validated = validate(input, self.reference())?;
        self.explain_validated(validated).map(|e| e.prediction)
    }

    /// Like [`Self::predict`] but keeps every intermediate result
    pub fn explain(&self, input: &PredictionInput) -> Result<Explanation, PredictError> {
        let validated = validate(input, self.reference())?;
        self.explain_validated(validated)
    }

    fn explain_validated(&self, validated: ValidatedInput) -> Result<Explanation, PredictError> {
        let (engineered, features) = self
            .pipeline
            .trace(validated.as_input())
            .map_err(|e| {
                error!("Feature preprocessing failed: {}", e);
                PredictError::PredictionFailed
            })?;

        let raw_output = self.model.predict(&features).map_err(|e| {
            error!(
                "Model inference failed: {}; feature vector has {} columns: {:?}",
                e,
                features.len(),
                features.columns()
            );
            PredictError::PredictionFailed
        })?;

        let prediction = self.postprocess(raw_output);
        if !prediction.is_finite() {
            error!(
                "Prediction is not finite (raw output {}); feature vector: {:?}",
                raw_output,
                features.values()
            );
            return Err(PredictError::PredictionFailed);
        }
        debug!("Raw model output {} -> prediction {}", raw_output, prediction);

        let substituted_city = validated.substituted_city().map(str::to_string);
        Ok(Explanation {
            input: validated.into_inner(),
            substituted_city,
            engineered,
            features,
            raw_output,
            prediction,
        })
    }

    /// Inverse target scaling (if loaded), then `expm1`
    fn postprocess(&self, raw: f64) -> f64 {
        let mut value = [raw];
        if let Some(scaler) = &self.target_scaler {
            scaler.inverse_transform(&mut value);
        }
        value[0].exp_m1()
    }
}

fn load_optional_scaler(path: &std::path::Path) -> Result<Option<StandardScaler>, ArtifactError> {
    match StandardScaler::load(path) {
        Ok(scaler) if scaler.len() != 1 => Err(ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason: format!("target scaler has {} columns, expected 1", scaler.len()),
        }),
        Ok(scaler) => {
            info!("Loaded target scaler from {}", path.display());
            Ok(Some(scaler))
        }
        Err(ArtifactError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "{} not found. Predictions will not be inverse scaled.",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SCALED_COLUMNS;
    use crate::inference::model::tests::{model_json, stump};
    use crate::models::input::sample_input;
    use std::fs;
    use tempfile::TempDir;

    struct Constant(f64);

    impl Regressor for Constant {
        fn predict(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl Regressor for Broken {
        fn predict(&self, _features: &FeatureVector) -> Result<f64> {
            anyhow::bail!("model exploded")
        }
    }

    fn reference() -> ReferenceData {
        ReferenceData::builder()
            .city("Riyadh", "Riyadh", 24.7136, 46.6753)
            .capital("Riyadh", "Riyadh")
            .build()
    }

    fn pipeline() -> FeaturePipeline {
        let n = SCALED_COLUMNS.len();
        FeaturePipeline::new(
            Arc::new(reference()),
            StandardScaler::new(vec![0.0; n], vec![1.0; n]),
        )
        .unwrap()
    }

    #[test]
    fn test_expm1_without_target_scaler() {
        let predictor = Predictor::new(pipeline(), Box::new(Constant(2.0)), None);
        let value = predictor.predict(&sample_input()).unwrap();
        assert!((value - 2f64.exp_m1()).abs() < 1e-12);
    }

    #[test]
    fn test_target_scaler_applied_before_expm1() {
        let target = StandardScaler::new(vec![12.0], vec![0.5]);
        let predictor = Predictor::new(pipeline(), Box::new(Constant(2.0)), Some(target));
        let value = predictor.predict(&sample_input()).unwrap();
        assert!((value - 13f64.exp_m1()).abs() < 1e-6);
    }

    #[test]
    fn test_validation_errors_pass_through() {
        let predictor = Predictor::new(pipeline(), Box::new(Constant(1.0)), None);
        let mut input = sample_input();
        input.asset_level = "Q".to_string();

        match predictor.predict(&input) {
            Err(PredictError::Invalid(errors)) => {
                assert!(errors.for_field("AssetLevelId").is_some())
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_model_failure_is_opaque() {
        let predictor = Predictor::new(pipeline(), Box::new(Broken), None);
        let err = predictor.predict(&sample_input()).unwrap_err();
        assert!(matches!(err, PredictError::PredictionFailed));
        assert_eq!(err.to_string(), "Prediction failed");
    }

    #[test]
    fn test_overflowing_output_is_failure() {
        let predictor = Predictor::new(pipeline(), Box::new(Constant(1e6)), None);
        let err = predictor.predict(&sample_input()).unwrap_err();
        assert!(matches!(err, PredictError::PredictionFailed));
    }

    #[test]
    fn test_explain_records_capital_fallback() {
        let predictor = Predictor::new(pipeline(), Box::new(Constant(0.0)), None);
        let mut input = sample_input();
        input.city = "Al Kharj".to_string();

        let explanation = predictor.explain(&input).unwrap();
        assert_eq!(explanation.substituted_city.as_deref(), Some("Al Kharj"));
        assert_eq!(explanation.input.city, "Riyadh");
        assert_eq!(explanation.prediction, 0.0);
    }

    fn write_artifacts(dir: &std::path::Path, with_target: bool) -> ArtifactPaths {
        fs::write(
            dir.join("city_center_coords.csv"),
            "City_en,Region,Latitude,Longitude\nRiyadh,Riyadh,24.7136,46.6753\n",
        )
        .unwrap();
        fs::write(dir.join("Regions_capitals.csv"), "Region,Capital\nRiyadh,Riyadh\n").unwrap();
        fs::write(
            dir.join("encoded_neighb_city.csv"),
            "PropAssetNeighborhoodName,PropAssetCityName,Encoded_Hood,Encoded_City\nحي الشفا,Riyadh,1600,2500\n",
        )
        .unwrap();

        let n = SCALED_COLUMNS.len();
        let scaler = serde_json::json!({
            "feature_names": SCALED_COLUMNS,
            "mean": vec![0.0; n],
            "scale": vec![1.0; n],
        });
        fs::write(dir.join("standard_scaler.json"), scaler.to_string()).unwrap();

        if with_target {
            fs::write(
                dir.join("target_scaler.json"),
                r#"{"mean": [1.0], "scale": [2.0]}"#,
            )
            .unwrap();
        }

        // Street-facing parcels are worth more
        let model = model_json(5.0, 1.0, vec![stump("NorthBorder_Type_Street", 0.5, 0.0, 1.0)]);
        fs::write(dir.join("model.json"), model.to_string()).unwrap();

        ArtifactPaths {
            model: dir.join("model.json"),
            feature_scaler: dir.join("standard_scaler.json"),
            target_scaler: dir.join("target_scaler.json"),
            reference: ReferencePaths::in_dir(dir),
        }
    }

    #[test]
    fn test_load_and_predict() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), true);

        let predictor = Predictor::load(&paths).unwrap();
        assert!(predictor.has_target_scaler());

        // raw 6.0 -> 6.0 * 2 + 1 = 13 -> expm1
        let value = predictor.predict(&sample_input()).unwrap();
        assert!((value - 13f64.exp_m1()).abs() < 1e-6 * 13f64.exp_m1());
    }

    #[test]
    fn test_missing_target_scaler_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), false);

        let predictor = Predictor::load(&paths).unwrap();
        assert!(!predictor.has_target_scaler());

        let mut input = sample_input();
        input.north_border = "قطعة رقم 12".to_string();
        let value = predictor.predict(&input).unwrap();
        assert!((value - 5f64.exp_m1()).abs() < 1e-9);
    }

    #[test]
    fn test_target_scaler_must_have_one_column() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), false);

        for body in [
            r#"{"mean": [], "scale": []}"#,
            r#"{"mean": [1.0, 2.0], "scale": [2.0, 3.0]}"#,
        ] {
            fs::write(&paths.target_scaler, body).unwrap();
            let err = load_optional_scaler(&paths.target_scaler).unwrap_err();
            assert!(matches!(err, ArtifactError::Invalid { .. }), "{body}");
            assert!(Predictor::load(&paths).is_err(), "{body}");
        }
    }

    #[test]
    fn test_missing_feature_scaler_is_fatal() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path(), true);
        fs::remove_file(&paths.feature_scaler).unwrap();

        assert!(Predictor::load(&paths).is_err());
    }
}
