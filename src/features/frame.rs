//! Single-row, name-addressed feature table passed between pipeline stages.

use hashbrown::HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::schema::{column_index, FEATURE_COUNT, TRAINING_COLUMNS};

/// Named columns of one input while it moves through the pipeline.
///
/// Missing values are stored as `NaN`.
#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    columns: HashMap<String, f64>,
}

impl FeatureFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: f64) {
        self.columns.insert(column.into(), value);
    }

    /// Store an optional value, `None` becoming `NaN`
    pub fn set_opt(&mut self, column: impl Into<String>, value: Option<f64>) {
        self.set(column, value.unwrap_or(f64::NAN));
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns.get(column).copied()
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut f64> {
        self.columns.get_mut(column)
    }

    pub fn extend<I: IntoIterator<Item = (String, f64)>>(&mut self, columns: I) {
        self.columns.extend(columns);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names, sorted for stable log output
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Model input in the exact training layout
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap values already laid out in training column order
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        (values.len() == FEATURE_COUNT).then_some(Self { values })
    }

    /// Values produced by iterating [`TRAINING_COLUMNS`]
    pub(super) fn aligned(values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), FEATURE_COUNT);
        Self { values }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &TRAINING_COLUMNS
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|i| self.values[i])
    }

    /// Pairs of (column, value) in training order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        TRAINING_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}
