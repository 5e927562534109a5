//! Derived features computed from the raw input and the reference tables.

use geo::Point;
use serde::Serialize;
use tracing::debug;

use super::distance::haversine_km;
use crate::models::{classify_border, BorderSide, BorderType, PredictionInput};
use crate::reference::ReferenceData;

/// Features derived before encoding and scaling.
///
/// `None` marks a value the reference data could not supply; it becomes 0
/// before the numeric transforms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineeredFeatures {
    /// Border types in [`BorderSide::all`] order
    pub border_types: [BorderType; 4],
    pub distance_from_center_km: Option<f64>,
    pub perimeter: f64,
    pub street_frontage: f64,
    pub num_street_fronts: u32,
    pub encoded_hood: Option<f64>,
    pub encoded_city: Option<f64>,
}

impl EngineeredFeatures {
    /// Border type classified for a side
    pub fn border_type(&self, side: BorderSide) -> BorderType {
        let idx = BorderSide::all()
            .iter()
            .position(|s| *s == side)
            .unwrap_or_default();
        self.border_types[idx]
    }
}

/// Run the engineering stage
pub fn engineer(input: &PredictionInput, reference: &ReferenceData) -> EngineeredFeatures {
    let distance_from_center_km = match reference.city_center(&input.city) {
        Some(center) => {
            let d = haversine_km(Point::new(input.longitude, input.latitude), center);
            debug!("Distance from centre of {}: {:.3} km", input.city, d);
            Some(d)
        }
        None => {
            debug!("City {} has no centre coordinates, distance left undefined", input.city);
            None
        }
    };

    let mut border_types = [BorderType::Other; 4];
    let mut perimeter = 0.0;
    let mut street_frontage = 0.0;
    let mut num_street_fronts = 0;

    for (i, side) in BorderSide::all().iter().enumerate() {
        let border_type = classify_border(input.border(*side));
        let length = input.length(*side);
        debug!("{} classified as {}", side.description_field(), border_type);

        border_types[i] = border_type;
        perimeter += length;
        if border_type == BorderType::Street {
            street_frontage += length;
            num_street_fronts += 1;
        }
    }

    let (encoded_hood, encoded_city) =
        match reference.neighborhood_encoding(&input.neighborhood, &input.city) {
            Some(enc) => (Some(enc.hood), Some(enc.city)),
            None => match reference.city_encoding(&input.city) {
                Some(city_code) => {
                    debug!(
                        "Using city encoding as fallback for neighbourhood {} in {}",
                        input.neighborhood, input.city
                    );
                    (Some(city_code), Some(city_code))
                }
                None => {
                    debug!(
                        "No encoding found for neighbourhood {} or city {}",
                        input.neighborhood, input.city
                    );
                    (None, None)
                }
            },
        };

    EngineeredFeatures {
        border_types,
        distance_from_center_km,
        perimeter,
        street_frontage,
        num_street_fronts,
        encoded_hood,
        encoded_city,
    }
}
