//! Column layout the model was trained on.
//!
//! Retraining the model with a different column list must bump
//! [`SCHEMA_VERSION`] and ship a matching [`TRAINING_COLUMNS`].

/// Version of the training column layout
pub const SCHEMA_VERSION: u32 = 1;

/// Number of model input columns
pub const FEATURE_COUNT: usize = 63;

/// Exact model input columns, in order
pub const TRAINING_COLUMNS: [&str; FEATURE_COUNT] = [
    "Area",
    "LengthFromNorth",
    "LengthFromSouth",
    "LengthFromEast",
    "LengthFromWest",
    "StreetWidth",
    "distance_from_center_km",
    "Perimeter",
    "Street_Frontage",
    "Num_Street_Fronts",
    "Encoded_Hood",
    "Encoded_City",
    "Latitude",
    "Longitude",
    "PropAssetRegionName_Asir",
    "PropAssetRegionName_Bahah",
    "PropAssetRegionName_Eastern Province",
    "PropAssetRegionName_Hail",
    "PropAssetRegionName_Jawf",
    "PropAssetRegionName_Jizan",
    "PropAssetRegionName_Madinah",
    "PropAssetRegionName_Makkah",
    "PropAssetRegionName_Najran",
    "PropAssetRegionName_Northern Borders",
    "PropAssetRegionName_Qassim",
    "PropAssetRegionName_Riyadh",
    "PropAssetRegionName_Tabuk",
    "EvaluationAssetTypeName_Commercial Land",
    "EvaluationAssetTypeName_Farming Land",
    "EvaluationAssetTypeName_Housing Land",
    "EvaluationAssetTypeName_Raw Land",
    "NorthBorder_Type_Alley",
    "NorthBorder_Type_Building",
    "NorthBorder_Type_Empty_Plot",
    "NorthBorder_Type_Other",
    "NorthBorder_Type_Parking",
    "NorthBorder_Type_Public_space",
    "NorthBorder_Type_Street",
    "SouthBorder_Type_Alley",
    "SouthBorder_Type_Building",
    "SouthBorder_Type_Empty_Plot",
    "SouthBorder_Type_Other",
    "SouthBorder_Type_Parking",
    "SouthBorder_Type_Public_space",
    "SouthBorder_Type_Street",
    "East_order_Type_Alley",
    "East_order_Type_Building",
    "East_order_Type_Empty_Plot",
    "East_order_Type_Other",
    "East_order_Type_Parking",
    "East_order_Type_Public_space",
    "East_order_Type_Street",
    "WestBorder_Type_Alley",
    "WestBorder_Type_Building",
    "WestBorder_Type_Empty_Plot",
    "WestBorder_Type_Other",
    "WestBorder_Type_Parking",
    "WestBorder_Type_Public_space",
    "WestBorder_Type_Street",
    "AssetLevelId_A",
    "AssetLevelId_B",
    "AssetLevelId_C",
    "AssetLevelId_D",
];

/// Columns the feature scaler was fitted on, in fit order.
///
/// `SARm2` is not produced at inference time and always enters the scaler as 0.
pub const SCALED_COLUMNS: [&str; 15] = [
    "Area",
    "LengthFromNorth",
    "LengthFromSouth",
    "LengthFromEast",
    "LengthFromWest",
    "StreetWidth",
    "Latitude",
    "Longitude",
    "distance_from_center_km",
    "SARm2",
    "Perimeter",
    "Street_Frontage",
    "Num_Street_Fronts",
    "Encoded_Hood",
    "Encoded_City",
];

/// Columns compressed with `log1p` before scaling
pub const LOG_COLUMNS: [&str; 7] = [
    "Area",
    "LengthFromNorth",
    "LengthFromSouth",
    "LengthFromEast",
    "LengthFromWest",
    "Perimeter",
    "distance_from_center_km",
];

/// Columns compressed with `sqrt` before scaling
pub const SQRT_COLUMNS: [&str; 2] = ["Encoded_Hood", "StreetWidth"];

/// Position of a column in the training layout
pub fn column_index(name: &str) -> Option<usize> {
    TRAINING_COLUMNS.iter().position(|c| *c == name)
}
