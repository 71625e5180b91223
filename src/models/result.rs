use serde::{Deserialize, Serialize};

use super::enums::{HealthStatus, RiskLabel};
use super::{Observation, PatientDetails};

/// An observation classified against its matched metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbnormalResult {
    #[serde(flatten)]
    pub observation: Observation,
    pub is_abnormal: bool,
    pub metric_name: String,
    pub standard_range: String,
    pub everlab_range: String,
    /// 0–100.
    pub risk_percentage: u8,
    pub risk_value: RiskLabel,
}

/// Opt-in summary of how many tests came back within range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAssessment {
    pub score: u8,
    pub status: HealthStatus,
    pub message: String,
    pub total_tests: usize,
    pub normal_tests: usize,
    pub abnormal_tests: usize,
}

/// Everything produced from one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningReport {
    pub patient: PatientDetails,
    pub observations: Vec<Observation>,
    pub abnormal_results: Vec<AbnormalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_assessment: Option<HealthAssessment>,
}
