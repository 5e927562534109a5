//! Numeric transforms: log/sqrt compression followed by standard scaling.

use tracing::debug;

use super::frame::FeatureFrame;
use super::scaler::StandardScaler;
use super::schema::{LOG_COLUMNS, SCALED_COLUMNS, SQRT_COLUMNS};

/// Missing values enter every transform as 0. This hides absent reference data
/// from the model; it is kept because the model was fitted the same way.
fn fill_missing(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Apply `f` to a column after filling a missing value with 0
fn map_column(frame: &mut FeatureFrame, column: &str, f: fn(f64) -> f64) {
    if let Some(value) = frame.get_mut(column) {
        let before = *value;
        *value = f(fill_missing(before));
        debug!("{}: {} -> {}", column, before, *value);
    }
}

/// Stage C: `log1p`, then `sqrt`, then one scaling pass over [`SCALED_COLUMNS`].
///
/// The scaler must have been fitted on [`SCALED_COLUMNS`].
pub fn apply_numeric_transforms(frame: &mut FeatureFrame, scaler: &StandardScaler) {
    for column in LOG_COLUMNS {
        map_column(frame, column, f64::ln_1p);
    }
    for column in SQRT_COLUMNS {
        map_column(frame, column, f64::sqrt);
    }

    let mut row: Vec<f64> = SCALED_COLUMNS
        .iter()
        .map(|c| frame.get(c).map(fill_missing).unwrap_or(0.0))
        .collect();
    scaler.transform(&mut row);

    for (column, value) in SCALED_COLUMNS.iter().zip(row) {
        frame.set(*column, value);
    }
    debug!("Scaled {} numeric columns", SCALED_COLUMNS.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_scaler() -> StandardScaler {
        StandardScaler::new(vec![0.0; SCALED_COLUMNS.len()], vec![1.0; SCALED_COLUMNS.len()])
    }

    #[test]
    fn test_log_and_sqrt() {
        let mut frame = FeatureFrame::new();
        frame.set("Area", 500.0);
        frame.set("StreetWidth", 16.0);
        frame.set("Latitude", 24.5);

        apply_numeric_transforms(&mut frame, &identity_scaler());
        assert_eq!(frame.get("Area"), Some(500f64.ln_1p()));
        assert_eq!(frame.get("StreetWidth"), Some(4.0));
        // untouched by log/sqrt
        assert_eq!(frame.get("Latitude"), Some(24.5));
    }

    #[test]
    fn test_missing_values_become_zero() {
        let mut frame = FeatureFrame::new();
        frame.set_opt("distance_from_center_km", None);
        frame.set_opt("Encoded_Hood", None);
        frame.set_opt("Encoded_City", None);

        apply_numeric_transforms(&mut frame, &identity_scaler());
        assert_eq!(frame.get("distance_from_center_km"), Some(0.0));
        assert_eq!(frame.get("Encoded_Hood"), Some(0.0));
        assert_eq!(frame.get("Encoded_City"), Some(0.0));
        // never produced upstream, still scaled as 0
        assert_eq!(frame.get("SARm2"), Some(0.0));
    }

    #[test]
    fn test_scaling_after_transforms() {
        let mut mean = vec![0.0; SCALED_COLUMNS.len()];
        let mut scale = vec![1.0; SCALED_COLUMNS.len()];
        // StreetWidth is the sixth scaled column
        mean[5] = 1.0;
        scale[5] = 3.0;
        let scaler = StandardScaler::new(mean, scale);

        let mut frame = FeatureFrame::new();
        frame.set("StreetWidth", 100.0);
        apply_numeric_transforms(&mut frame, &scaler);
        assert_eq!(frame.get("StreetWidth"), Some(3.0));
    }

    #[test]
    fn test_log_round_trip() {
        for x in [0.0, 0.5, 12.0, 1050.0, 2.5e6] {
            let back = f64::exp_m1(f64::ln_1p(x));
            assert!((back - x).abs() <= 1e-9 * x.max(1.0), "{x} -> {back}");
        }
    }
}
