//! Service configuration loaded from an optional TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inference::ArtifactPaths;
use crate::reference::{resolve, ReferencePaths};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Artifact file names, relative ones resolved against `data_dir`
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArtifactConfig {
    pub data_dir: PathBuf,
    pub model: PathBuf,
    pub feature_scaler: PathBuf,
    pub target_scaler: PathBuf,
    pub city_centers: PathBuf,
    pub region_capitals: PathBuf,
    pub neighborhood_encodings: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            model: PathBuf::from("gbm_model.json"),
            feature_scaler: PathBuf::from("standard_scaler.json"),
            target_scaler: PathBuf::from("target_scaler.json"),
            city_centers: PathBuf::from("city_center_coords.csv"),
            region_capitals: PathBuf::from("Regions_capitals.csv"),
            neighborhood_encodings: PathBuf::from("encoded_neighb_city.csv"),
        }
    }
}

impl ArtifactConfig {
    pub fn paths(&self) -> ArtifactPaths {
        let dir = &self.data_dir;
        ArtifactPaths {
            model: resolve(dir, &self.model),
            feature_scaler: resolve(dir, &self.feature_scaler),
            target_scaler: resolve(dir, &self.target_scaler),
            reference: ReferencePaths {
                city_centers: resolve(dir, &self.city_centers),
                region_capitals: resolve(dir, &self.region_capitals),
                neighborhood_encodings: resolve(dir, &self.neighborhood_encodings),
            },
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load the file if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
