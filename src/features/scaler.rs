//! Pre-fitted standard scaler loaded from a JSON export.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ArtifactError;

/// Affine `(x - mean) / scale` transform with parameters fixed at training time
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    /// Names of the fitted columns, when the export recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            feature_names: None,
            mean,
            scale,
        }
    }

    /// Load and check a scaler export
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scaler: StandardScaler =
            serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Err(reason) = scaler.check() {
            return Err(ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason,
            });
        }
        Ok(scaler)
    }

    fn check(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "{} feature names for {} fitted columns",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        if self.mean.iter().chain(self.scale.iter()).any(|v| !v.is_finite()) {
            return Err("non-finite parameter".to_string());
        }
        Ok(())
    }

    /// Number of fitted columns
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Check that the scaler was fitted on exactly these columns
    pub fn expect_columns(&self, columns: &[&str]) -> Result<(), String> {
        if self.len() != columns.len() {
            return Err(format!(
                "scaler has {} columns, expected {}",
                self.len(),
                columns.len()
            ));
        }
        if let Some(names) = &self.feature_names {
            for (i, (got, want)) in names.iter().zip(columns).enumerate() {
                if got != want {
                    return Err(format!("column {i} is '{got}', expected '{want}'"));
                }
            }
        }
        Ok(())
    }

    /// Scale a row in place. The row must have [`Self::len`] entries.
    pub fn transform(&self, row: &mut [f64]) {
        for ((x, mean), scale) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            *x = (*x - mean) / effective_scale(*scale);
        }
    }

    /// Undo the scaling of a row in place
    pub fn inverse_transform(&self, row: &mut [f64]) {
        for ((x, mean), scale) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            *x = *x * effective_scale(*scale) + mean;
        }
    }
}

/// Zero-variance columns are fitted with unit scale
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}
