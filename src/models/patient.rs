use serde::{Deserialize, Serialize};

/// Patient identity extracted from the PID segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    pub id: String,
    /// Family and given name joined by a space.
    pub name: String,
    /// `DD/MM/YYYY`, empty when the message carries no birth date.
    pub date_of_birth: String,
    /// Administrative sex code exactly as sent (`M`, `F`, `U`, ...).
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl PatientDetails {
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}
