use crate::models::enums::HealthStatus;

/// Patient-facing sentences attached to a health assessment.
/// Calm framing: point to a healthcare provider, never alarm.
pub struct AdvisoryMessages;

impl AdvisoryMessages {
    pub fn for_status(status: HealthStatus) -> &'static str {
        match status {
            HealthStatus::Excellent => Self::EXCELLENT,
            HealthStatus::Good => Self::GOOD,
            HealthStatus::Fair => Self::FAIR,
            HealthStatus::Poor => Self::POOR,
        }
    }

    const EXCELLENT: &'static str = "Your test results indicate excellent overall health. \
         Keep maintaining your healthy lifestyle!";

    const GOOD: &'static str = "Your test results indicate good overall health. \
         Continue your healthy habits and regular check-ups.";

    const FAIR: &'static str = "Your test results show some areas for improvement. \
         Consider discussing these results with your healthcare provider \
         to develop a plan for better health.";

    const POOR: &'static str = "Your test results suggest some areas that need attention. \
         We recommend scheduling a follow-up with your healthcare provider \
         to discuss these results.";

    /// Envelope message for a processed upload.
    pub fn processed(patient_name: &str) -> String {
        format!("Processed results for patient {}", patient_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_a_message() {
        for status in [
            HealthStatus::Excellent,
            HealthStatus::Good,
            HealthStatus::Fair,
            HealthStatus::Poor,
        ] {
            assert!(!AdvisoryMessages::for_status(status).is_empty());
        }
    }

    #[test]
    fn messages_refer_to_provider_when_attention_needed() {
        assert!(AdvisoryMessages::for_status(HealthStatus::Poor).contains("healthcare provider"));
        assert!(AdvisoryMessages::for_status(HealthStatus::Fair).contains("healthcare provider"));
    }

    #[test]
    fn no_alarm_wording() {
        for status in [HealthStatus::Fair, HealthStatus::Poor] {
            let msg = AdvisoryMessages::for_status(status).to_lowercase();
            assert!(!msg.contains("urgent"));
            assert!(!msg.contains("immediately"));
        }
    }

    #[test]
    fn continuation_lines_join_with_single_space() {
        assert_eq!(
            AdvisoryMessages::for_status(HealthStatus::Excellent),
            "Your test results indicate excellent overall health. Keep maintaining your healthy lifestyle!"
        );
    }

    #[test]
    fn processed_message_names_patient() {
        assert_eq!(
            AdvisoryMessages::processed("SMITH JOHN"),
            "Processed results for patient SMITH JOHN"
        );
    }
}
