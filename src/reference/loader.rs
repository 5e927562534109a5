//! CSV loaders for the reference tables.

use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{ReferenceData, ReferenceDataBuilder};
use crate::error::ReferenceError;

/// Locations of the three reference tables
#[derive(Debug, Clone)]
pub struct ReferencePaths {
    /// `City_en`, `Region`, `Latitude`, `Longitude`
    pub city_centers: PathBuf,
    /// `Region`, `Capital`
    pub region_capitals: PathBuf,
    /// `PropAssetNeighborhoodName`, `PropAssetCityName`, `Encoded_Hood`, `Encoded_City`
    pub neighborhood_encodings: PathBuf,
}

impl ReferencePaths {
    /// Default file names resolved against a data directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            city_centers: dir.join("city_center_coords.csv"),
            region_capitals: dir.join("Regions_capitals.csv"),
            neighborhood_encodings: dir.join("encoded_neighb_city.csv"),
        }
    }
}

impl ReferenceData {
    /// Load all reference tables. Any missing or malformed table is fatal.
    pub fn load(paths: &ReferencePaths) -> Result<Self, ReferenceError> {
        let mut builder = ReferenceData::builder();

        load_city_centers(&paths.city_centers, &mut builder)?;
        load_region_capitals(&paths.region_capitals, &mut builder)?;
        load_encodings(&paths.neighborhood_encodings, &mut builder)?;

        let data = builder.build();
        info!(
            "Loaded reference data: {} cities, {} regions with capitals, {} neighbourhood encodings",
            data.city_count(),
            data.region_capitals.len(),
            data.encoding_count()
        );
        Ok(data)
    }
}

/// Open a headed CSV file and yield its header row alongside the reader
struct Table {
    path: PathBuf,
    reader: csv::Reader<std::fs::File>,
    headers: StringRecord,
}

impl Table {
    fn open(path: &Path) -> Result<Self, ReferenceError> {
        let read_err = |source| ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(read_err)?;
        let headers = reader.headers().map_err(read_err)?.clone();

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
        })
    }

    fn column(&self, name: &'static str) -> Result<usize, ReferenceError> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| ReferenceError::MissingColumn {
                path: self.path.clone(),
                column: name,
            })
    }

    /// Visit each record in file order
    fn for_each<F>(&mut self, mut f: F) -> Result<(), ReferenceError>
    where
        F: FnMut(&Path, u64, &StringRecord) -> Result<(), ReferenceError>,
    {
        let mut record = StringRecord::new();
        let mut index = 0u64;
        loop {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|source| ReferenceError::Read {
                    path: self.path.clone(),
                    source,
                })?;
            if !more {
                break;
            }
            index += 1;
            f(&self.path, index, &record)?;
        }
        Ok(())
    }
}

fn parse_number(
    path: &Path,
    record_index: u64,
    record: &StringRecord,
    idx: usize,
    column: &'static str,
) -> Result<f64, ReferenceError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .map_err(|_| ReferenceError::InvalidNumber {
            path: path.to_path_buf(),
            record: record_index,
            column,
            value: raw.to_string(),
        })
}

fn load_city_centers(path: &Path, builder: &mut ReferenceDataBuilder) -> Result<(), ReferenceError> {
    info!("Loading city centres from {}", path.display());
    let mut table = Table::open(path)?;
    let city_idx = table.column("City_en")?;
    let region_idx = table.column("Region")?;
    let lat_idx = table.column("Latitude")?;
    let lon_idx = table.column("Longitude")?;

    table.for_each(|path, n, record| {
        let city = record.get(city_idx).unwrap_or("");
        if city.is_empty() {
            return Ok(());
        }
        let region = record.get(region_idx).unwrap_or("");
        let lat = parse_number(path, n, record, lat_idx, "Latitude")?;
        let lon = parse_number(path, n, record, lon_idx, "Longitude")?;
        builder.add_city(city, region, lat, lon);
        Ok(())
    })
}

fn load_region_capitals(path: &Path, builder: &mut ReferenceDataBuilder) -> Result<(), ReferenceError> {
    info!("Loading region capitals from {}", path.display());
    let mut table = Table::open(path)?;
    let region_idx = table.column("Region")?;
    let capital_idx = table.column("Capital")?;

    table.for_each(|_, _, record| {
        let region = record.get(region_idx).unwrap_or("");
        let capital = record.get(capital_idx).unwrap_or("");
        if !region.is_empty() && !capital.is_empty() {
            builder.add_capital(region, capital);
        }
        Ok(())
    })
}

fn load_encodings(path: &Path, builder: &mut ReferenceDataBuilder) -> Result<(), ReferenceError> {
    info!("Loading neighbourhood encodings from {}", path.display());
    let mut table = Table::open(path)?;
    let hood_idx = table.column("PropAssetNeighborhoodName")?;
    let city_idx = table.column("PropAssetCityName")?;
    let encoded_hood_idx = table.column("Encoded_Hood")?;
    let encoded_city_idx = table.column("Encoded_City")?;

    table.for_each(|path, n, record| {
        let hood = record.get(hood_idx).unwrap_or("");
        let city = record.get(city_idx).unwrap_or("");
        let encoded_hood = parse_number(path, n, record, encoded_hood_idx, "Encoded_Hood")?;
        let encoded_city = parse_number(path, n, record, encoded_city_idx, "Encoded_City")?;
        builder.add_encoding(hood, city, encoded_hood, encoded_city);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_tables(dir: &Path) {
        fs::write(
            dir.join("city_center_coords.csv"),
            "City_en,Region,Latitude,Longitude,City_ar\n\
             Riyadh,Riyadh,24.7136,46.6753,الرياض\n\
             Jeddah,Makkah,21.5433,39.1728,جدة\n",
        )
        .unwrap();
        fs::write(
            dir.join("Regions_capitals.csv"),
            "Region,Capital\nRiyadh,Riyadh\nMakkah,Makkah\n",
        )
        .unwrap();
        fs::write(
            dir.join("encoded_neighb_city.csv"),
            "PropAssetNeighborhoodName,PropAssetCityName,Encoded_Hood,Encoded_City\n\
             حي الشفا,Riyadh,1520.5,2300.25\n\
             الروضة,Jeddah,1800,2100\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_tables() {
        let dir = TempDir::new().unwrap();
        write_tables(dir.path());

        let data = ReferenceData::load(&ReferencePaths::in_dir(dir.path())).unwrap();
        assert_eq!(data.city_count(), 2);
        assert_eq!(data.region_of("Jeddah"), Some("Makkah"));
        assert_eq!(data.capital_of("Makkah"), Some("Makkah"));
        assert_eq!(data.city_encoding("Jeddah"), Some(2100.0));
        let enc = data.neighborhood_encoding("حي الشفا", "Riyadh").unwrap();
        assert_eq!(enc.hood, 1520.5);
        assert_eq!(enc.city, 2300.25);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = ReferenceData::load(&ReferencePaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, ReferenceError::Read { .. }));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_tables(dir.path());
        fs::write(dir.path().join("Regions_capitals.csv"), "Region,Seat\nRiyadh,Riyadh\n").unwrap();

        let err = ReferenceData::load(&ReferencePaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            ReferenceError::MissingColumn {
                column: "Capital",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_number_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_tables(dir.path());
        fs::write(
            dir.path().join("city_center_coords.csv"),
            "City_en,Region,Latitude,Longitude\nRiyadh,Riyadh,north,46.6\n",
        )
        .unwrap();

        let err = ReferenceData::load(&ReferencePaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            ReferenceError::InvalidNumber {
                column: "Latitude",
                record: 1,
                ..
            }
        ));
    }
}
