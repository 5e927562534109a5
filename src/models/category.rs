//! Fixed categorical vocabularies for regions, asset types and asset levels.

/// Region names accepted on input
pub const VALID_REGIONS: &[&str] = &[
    "Riyadh",
    "Makkah",
    "Madinah",
    "Eastern Province",
    "Asir",
    "Tabuk",
    "Hail",
    "Northern Borders",
    "Jazan",
    "Najran",
    "Al Baha",
    "Al Jawf",
    "Al Qassim",
];

/// Region vocabulary the region encoder was fitted on.
///
/// This differs from [`VALID_REGIONS`] for several regions; such values encode
/// to an all-zero row.
pub const REGION_VOCABULARY: &[&str] = &[
    "Riyadh",
    "Makkah",
    "Madinah",
    "Eastern Province",
    "Asir",
    "Tabuk",
    "Hail",
    "Northern Borders",
    "Jazan",
    "Najran",
    "Bahah",
    "Jawf",
    "Qassim",
];

/// Evaluation asset types
pub const ASSET_TYPES: &[&str] = &["Housing Land", "Commercial Land", "Raw Land", "Farming Land"];

/// Asset levels
pub const ASSET_LEVELS: &[&str] = &["A", "B", "C", "D"];
