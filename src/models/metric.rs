use serde::{Deserialize, Serialize};

/// A reference-range record as delivered by a metric provider.
///
/// Codes and units are kept in their raw `;`-delimited form; they are split
/// when the record is converted into a [`Metric`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub id: String,
    pub diagnostic_id: String,
    pub name: String,
    pub standard_lower: f64,
    pub standard_higher: f64,
    pub everlab_lower: f64,
    pub everlab_higher: f64,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub gender: Option<String>,
    pub oru_sonic_codes: String,
    pub oru_sonic_units: String,
}

/// An indexed reference-range entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub diagnostic_id: String,
    pub name: String,
    pub standard_lower: f64,
    pub standard_higher: f64,
    /// Stricter band used as the default abnormality threshold.
    pub everlab_lower: f64,
    pub everlab_higher: f64,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub gender: Option<String>,
    pub codes: Vec<String>,
    pub units: Vec<String>,
}

impl Metric {
    /// `"lower-higher"` of the standard band.
    pub fn standard_range(&self) -> String {
        format!("{}-{}", self.standard_lower, self.standard_higher)
    }

    /// `"lower-higher"` of the stricter band.
    pub fn everlab_range(&self) -> String {
        format!("{}-{}", self.everlab_lower, self.everlab_higher)
    }
}

impl From<MetricRecord> for Metric {
    fn from(record: MetricRecord) -> Self {
        Self {
            codes: split_list(&record.oru_sonic_codes),
            units: split_list(&record.oru_sonic_units),
            id: record.id,
            diagnostic_id: record.diagnostic_id,
            name: record.name,
            standard_lower: record.standard_lower,
            standard_higher: record.standard_higher,
            everlab_lower: record.everlab_lower,
            everlab_higher: record.everlab_higher,
            min_age: record.min_age,
            max_age: record.max_age,
            gender: record
                .gender
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty()),
        }
    }
}

/// Split a `;`-delimited list, trimming entries and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
