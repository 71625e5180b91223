use serde::{Deserialize, Serialize};

/// A numeric test result taken from an OBX segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub code: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    /// OBX-7 text as sent, e.g. `"4.0-5.0"`, `"<1.5"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,
    /// Observation time of the enclosing OBR, `DD/MM/YYYY HH:MM:SS`.
    pub date_time: String,
}
