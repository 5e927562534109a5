//! Request and response payloads for the prediction endpoint.

use serde::{Deserialize, Serialize};

use super::BorderSide;

/// Raw parcel description as submitted by a client.
///
/// Field names follow the training data columns, including the `East_order`
/// spelling for the east border description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(rename = "PropAssetNeighborhoodName")]
    pub neighborhood: String,

    #[serde(rename = "PropAssetRegionName")]
    pub region: String,

    #[serde(rename = "PropAssetCityName")]
    pub city: String,

    #[serde(rename = "Area")]
    pub area: f64,

    #[serde(rename = "LengthFromNorth")]
    pub length_north: f64,

    #[serde(rename = "LengthFromSouth")]
    pub length_south: f64,

    #[serde(rename = "LengthFromEast")]
    pub length_east: f64,

    #[serde(rename = "LengthFromWest")]
    pub length_west: f64,

    #[serde(rename = "NorthBorder")]
    pub north_border: String,

    #[serde(rename = "SouthBorder")]
    pub south_border: String,

    #[serde(rename = "East_order")]
    pub east_border: String,

    #[serde(rename = "WestBorder")]
    pub west_border: String,

    #[serde(rename = "StreetWidth")]
    pub street_width: f64,

    #[serde(rename = "Latitude")]
    pub latitude: f64,

    #[serde(rename = "Longitude")]
    pub longitude: f64,

    #[serde(rename = "EvaluationAssetTypeName")]
    pub asset_type: String,

    #[serde(rename = "AssetLevelId")]
    pub asset_level: String,
}

impl PredictionInput {
    /// Border description for a side
    pub fn border(&self, side: BorderSide) -> &str {
        match side {
            BorderSide::North => &self.north_border,
            BorderSide::South => &self.south_border,
            BorderSide::East => &self.east_border,
            BorderSide::West => &self.west_border,
        }
    }

    /// Border length for a side
    pub fn length(&self, side: BorderSide) -> f64 {
        match side {
            BorderSide::North => self.length_north,
            BorderSide::South => self.length_south,
            BorderSide::East => self.length_east,
            BorderSide::West => self.length_west,
        }
    }
}

/// Successful prediction payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

#[cfg(test)]
pub(crate) fn sample_input() -> PredictionInput {
    PredictionInput {
        neighborhood: "حي الشفا".to_string(),
        region: "Riyadh".to_string(),
        city: "Riyadh".to_string(),
        area: 500.0,
        length_north: 20.0,
        length_south: 20.0,
        length_east: 25.0,
        length_west: 25.0,
        north_border: "شارع الرئيسي".to_string(),
        south_border: "مبنى تجاري".to_string(),
        east_border: "قطعة ارض".to_string(),
        west_border: "حديقة عامة".to_string(),
        street_width: 15.0,
        latitude: 24.7136,
        longitude: 46.6753,
        asset_type: "Housing Land".to_string(),
        asset_level: "A".to_string(),
    }
}
