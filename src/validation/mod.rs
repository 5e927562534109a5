//! Input validation against the fixed vocabularies and the reference tables.
//!
//! Validation runs before any feature computation. Every failing field is
//! reported; the only silent correction is replacing an unknown city with its
//! region's capital.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

use crate::models::{PredictionInput, ASSET_LEVELS, ASSET_TYPES, VALID_REGIONS};
use crate::reference::ReferenceData;

/// Arabic letters, English letters, digits, whitespace, hyphens and periods
static FREE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\x{0600}-\x{06FF}\x{0750}-\x{077F}a-zA-Z0-9\s\-\.]+$")
        .expect("free text pattern is valid")
});

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// All field errors found in one input
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First error reported for a field
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Input that passed validation, with numbers rounded, text trimmed and the
/// city possibly replaced by the region capital
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    input: PredictionInput,
    substituted_city: Option<String>,
}

impl ValidatedInput {
    pub fn as_input(&self) -> &PredictionInput {
        &self.input
    }

    pub fn into_inner(self) -> PredictionInput {
        self.input
    }

    /// Original city name when the capital fallback was applied
    pub fn substituted_city(&self) -> Option<&str> {
        self.substituted_city.as_deref()
    }
}

/// Validate and normalise a raw input
pub fn validate(
    input: &PredictionInput,
    reference: &ReferenceData,
) -> Result<ValidatedInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut out = input.clone();

    out.neighborhood = check_text(&mut errors, "PropAssetNeighborhoodName", &input.neighborhood);
    out.north_border = check_text(&mut errors, "NorthBorder", &input.north_border);
    out.south_border = check_text(&mut errors, "SouthBorder", &input.south_border);
    out.east_border = check_text(&mut errors, "East_order", &input.east_border);
    out.west_border = check_text(&mut errors, "WestBorder", &input.west_border);

    let region_ok = VALID_REGIONS.contains(&input.region.as_str());
    if !region_ok {
        errors.push(
            "PropAssetRegionName",
            format!(
                "PropAssetRegionName must be one of: {}",
                VALID_REGIONS.join(", ")
            ),
        );
    }

    let mut substituted_city = None;
    if input.city.trim().is_empty() {
        errors.push(
            "PropAssetCityName",
            "Field cannot be empty or contain only whitespace",
        );
    } else if reference.is_valid_city(&input.city) {
        if region_ok {
            let expected = reference.region_of(&input.city).unwrap_or_default();
            if expected != input.region {
                errors.push(
                    "PropAssetRegionName",
                    format!(
                        "City {} belongs to region {}, but {} was provided",
                        input.city, expected, input.region
                    ),
                );
            }
        }
    } else if !region_ok {
        errors.push(
            "PropAssetCityName",
            format!(
                "City {} not found. Please provide a valid region first.",
                input.city
            ),
        );
    } else {
        match capital_fallback(reference, &input.region) {
            Some(capital) => {
                warn!(
                    "City '{}' not found. Using region capital '{}' instead.",
                    input.city, capital
                );
                substituted_city = Some(input.city.clone());
                out.city = capital.to_string();
            }
            None => errors.push(
                "PropAssetCityName",
                format!(
                    "City {} not found and no valid capital found for region {}",
                    input.city, input.region
                ),
            ),
        }
    }

    out.area = check_positive(&mut errors, "Area", input.area);
    out.length_north = check_positive(&mut errors, "LengthFromNorth", input.length_north);
    out.length_south = check_positive(&mut errors, "LengthFromSouth", input.length_south);
    out.length_east = check_positive(&mut errors, "LengthFromEast", input.length_east);
    out.length_west = check_positive(&mut errors, "LengthFromWest", input.length_west);
    out.street_width = check_positive(&mut errors, "StreetWidth", input.street_width);

    out.latitude = check_coordinate(&mut errors, "Latitude", input.latitude, 90.0);
    out.longitude = check_coordinate(&mut errors, "Longitude", input.longitude, 180.0);

    if !ASSET_LEVELS.contains(&input.asset_level.as_str()) {
        errors.push(
            "AssetLevelId",
            format!("AssetLevelId must be one of: {}", ASSET_LEVELS.join(", ")),
        );
    }
    if !ASSET_TYPES.contains(&input.asset_type.as_str()) {
        errors.push(
            "EvaluationAssetTypeName",
            format!(
                "EvaluationAssetTypeName must be one of: {}",
                ASSET_TYPES.join(", ")
            ),
        );
    }

    if errors.is_empty() {
        Ok(ValidatedInput {
            input: out,
            substituted_city,
        })
    } else {
        Err(errors)
    }
}

/// Capital of the region, if it is itself a known city of that region
fn capital_fallback<'a>(reference: &'a ReferenceData, region: &str) -> Option<&'a str> {
    let capital = reference.capital_of(region)?;
    (reference.region_of(capital) == Some(region)).then_some(capital)
}

fn check_text(errors: &mut ValidationErrors, field: &'static str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "Field cannot be empty or contain only whitespace");
    } else if !FREE_TEXT.is_match(value) {
        errors.push(
            field,
            "Field can only contain Arabic letters, English letters, numbers, spaces, hyphens, and periods",
        );
    }
    trimmed.to_string()
}

fn check_positive(errors: &mut ValidationErrors, field: &'static str, value: f64) -> f64 {
    // Documented as >= 0 in the public contract but zero is rejected
    if !value.is_finite() || value <= 0.0 {
        errors.push(field, "Value must be greater than 0");
        return value;
    }
    round_to(value, 2)
}

fn check_coordinate(errors: &mut ValidationErrors, field: &'static str, value: f64, limit: f64) -> f64 {
    if !value.is_finite() || value < -limit || value > limit {
        errors.push(field, format!("{field} must be between -{limit} and {limit}"));
        return value;
    }
    round_to(value, 6)
}

/// Round half to even at `decimals` places. Values too large to scale are
/// already coarser than the requested precision and are returned unchanged.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}
