use std::time::Instant;

use crate::hl7::{parse_oru, ParseError, ParsedMessage};
use crate::models::enums::{HealthStatus, RiskLabel};
use crate::models::{AbnormalResult, HealthAssessment, Metric, Observation, ScreeningReport};

use super::evaluator::evaluate;
use super::messages::AdvisoryMessages;
use super::reference::MetricIndex;
use super::risk::{score, RiskScore};

/// Per-call switches for [`screen_message`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreeningOptions {
    /// Attach a [`HealthAssessment`] to the report.
    pub health_assessment: bool,
}

/// Classify one observation against the table.
///
/// `None` when no metric matches at all or the patient is outside the
/// metric's criteria. A metric found only by name yields a display record
/// that is never abnormal.
pub fn calculate_abnormal_result(
    observation: &Observation,
    age: u32,
    gender: &str,
    index: &MetricIndex,
) -> Option<AbnormalResult> {
    let found = index.resolve(&observation.code, &observation.unit, &observation.name)?;

    if !found.tier.can_classify() {
        return Some(build_result(observation, found.metric, false, RiskScore::NORMAL));
    }

    let verdict = evaluate(observation, Some(found.metric), age, gender)?;
    let risk = match verdict.band {
        Some(band) if verdict.is_abnormal => score(observation.value, band.lower, band.upper),
        _ => RiskScore::NORMAL,
    };

    Some(build_result(observation, found.metric, verdict.is_abnormal, risk))
}

/// Abnormal results only, in observation order.
pub fn process_abnormal_results(
    observations: &[Observation],
    age: u32,
    gender: &str,
    index: &MetricIndex,
) -> Vec<AbnormalResult> {
    let results: Vec<AbnormalResult> = observations
        .iter()
        .filter_map(|obs| calculate_abnormal_result(obs, age, gender, index))
        .filter(|result| result.is_abnormal)
        .collect();

    tracing::debug!(
        observations = observations.len(),
        abnormal = results.len(),
        age,
        gender,
        "Abnormal results collected"
    );
    results
}

fn build_result(
    observation: &Observation,
    metric: &Metric,
    is_abnormal: bool,
    risk: RiskScore,
) -> AbnormalResult {
    AbnormalResult {
        observation: observation.clone(),
        is_abnormal,
        metric_name: metric.name.clone(),
        standard_range: metric.standard_range(),
        everlab_range: metric.everlab_range(),
        risk_percentage: risk.percentage,
        risk_value: risk.label,
    }
}

// ---------------------------------------------------------------------------
// Health assessment
// ---------------------------------------------------------------------------

impl HealthStatus {
    /// Poor < 60 ≤ Fair < 80 ≤ Good < 90 ≤ Excellent.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=59 => HealthStatus::Poor,
            60..=79 => HealthStatus::Fair,
            80..=89 => HealthStatus::Good,
            _ => HealthStatus::Excellent,
        }
    }
}

impl HealthAssessment {
    /// Share of tests within range. An empty panel scores 100.
    pub fn from_counts(total: usize, abnormal: usize) -> Self {
        let abnormal = abnormal.min(total);
        let normal = total - abnormal;
        let score = if total == 0 {
            100
        } else {
            (normal as f64 / total as f64 * 100.0).round() as u8
        };
        let status = HealthStatus::from_score(score);

        Self {
            score,
            status,
            message: AdvisoryMessages::for_status(status).to_string(),
            total_tests: total,
            normal_tests: normal,
            abnormal_tests: abnormal,
        }
    }
}

impl ScreeningReport {
    pub fn with_health_assessment(mut self) -> Self {
        self.health_assessment = Some(HealthAssessment::from_counts(
            self.observations.len(),
            self.abnormal_results.len(),
        ));
        self
    }

    /// Count of results flagged `High`.
    pub fn high_count(&self) -> usize {
        self.abnormal_results
            .iter()
            .filter(|r| r.risk_value == RiskLabel::High)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Parse a message and screen its observations against `index`.
pub fn screen_message(
    text: &str,
    index: &MetricIndex,
    options: ScreeningOptions,
) -> Result<ScreeningReport, ParseError> {
    let parsed = parse_oru(text)?;
    Ok(screen_parsed(parsed, index, options))
}

/// Screen an already-parsed message.
pub fn screen_parsed(
    parsed: ParsedMessage,
    index: &MetricIndex,
    options: ScreeningOptions,
) -> ScreeningReport {
    let start = Instant::now();
    let ParsedMessage {
        patient,
        observations,
    } = parsed;

    let abnormal_results = process_abnormal_results(
        &observations,
        patient.age.unwrap_or(0),
        &patient.gender,
        index,
    );

    let mut report = ScreeningReport {
        patient,
        observations,
        abnormal_results,
        health_assessment: None,
    };
    if options.health_assessment {
        report = report.with_health_assessment();
    }

    tracing::info!(
        patient_id = %report.patient.id,
        observations = report.observations.len(),
        abnormal = report.abnormal_results.len(),
        high = report.high_count(),
        processing_ms = start.elapsed().as_millis() as u64,
        "Screening complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::hl7::parse_oru_at;

    use super::super::reference::fixtures::load_test;
    use super::*;

    fn obs(code: &str, name: &str, value: f64, unit: &str, range: Option<&str>) -> Observation {
        Observation {
            code: code.into(),
            name: name.into(),
            value,
            unit: unit.into(),
            reference_range: range.map(str::to_string),
            date_time: "01/03/2024 08:15:30".into(),
        }
    }

    const MESSAGE: &str = "MSH|^~\\&|LAB|EVERLAB|APP|CLINIC|20240301090000||ORU^R01|MSG001|P|2.4\r\
PID|1||P12345^^^EVL^MR||SMITH^JANE||19850615|F\r\
OBR|1|ORD1||PANEL^General|||20240301081530\r\
OBX|1|NM|HB^Haemoglobin||150|g/L||N|||F\r\
OBX|2|NM|GLU^Glucose||6.1|mmol/L|4.0-5.5|H|||F\r\
OBX|3|NM|CRP^C-Reactive Protein||2|mg/L|<5|N|||F\r\
OBX|4|NM|FERR^Ferritin||20|ug/L||L|||F\r\
OBX|5|NM|VITD^Vitamin D||30|nmol/L||L|||F\r\
OBX|6|NM|PSA^Prostate Specific Antigen||9|ng/mL||H|||F\r";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn results_keep_observation_order() {
        let index = load_test();
        let observations = vec![
            obs("HB", "Haemoglobin", 150.0, "g/L", None),
            obs("GLU", "Glucose", 6.1, "mmol/L", None),
            obs("CRP", "CRP", 9.0, "mg/L", None),
        ];
        let results = process_abnormal_results(&observations, 40, "M", &index);
        let codes: Vec<&str> = results.iter().map(|r| r.observation.code.as_str()).collect();
        assert_eq!(codes, vec!["GLU", "CRP"]);
    }

    #[test]
    fn abnormal_result_carries_metric_ranges_and_risk() {
        let index = load_test();
        let result = calculate_abnormal_result(
            &obs("GLU", "Glucose", 5.5, "mmol/L", Some("4.0-5.0")),
            40,
            "M",
            &index,
        )
        .unwrap();

        assert!(result.is_abnormal);
        assert_eq!(result.metric_name, "Fasting Glucose");
        assert_eq!(result.standard_range, "3-7.8");
        assert_eq!(result.everlab_range, "4-5.5");
        assert_eq!(result.risk_percentage, 50);
        assert_eq!(result.risk_value, RiskLabel::High);
    }

    #[test]
    fn normal_result_is_returned_but_not_emitted() {
        let index = load_test();
        let normal = obs("HB", "Haemoglobin", 150.0, "g/L", None);

        let result = calculate_abnormal_result(&normal, 40, "M", &index).unwrap();
        assert!(!result.is_abnormal);
        assert_eq!(result.risk_value, RiskLabel::Normal);

        assert!(process_abnormal_results(&[normal], 40, "M", &index).is_empty());
    }

    #[test]
    fn value_on_inline_bound_is_abnormal_with_zero_risk() {
        let index = load_test();
        let result =
            calculate_abnormal_result(&obs("CRP", "CRP", 5.0, "mg/L", Some("<5")), 40, "M", &index)
                .unwrap();
        assert!(result.is_abnormal);
        assert_eq!(result.risk_percentage, 0);
        assert_eq!(result.risk_value, RiskLabel::Normal);
    }

    #[test]
    fn ineligible_patient_is_skipped() {
        let index = load_test();
        let ferritin = obs("FERR", "Ferritin", 5.0, "ug/L", None);

        assert!(calculate_abnormal_result(&ferritin, 70, "F", &index).is_none());
        assert!(calculate_abnormal_result(&ferritin, 40, "M", &index).is_none());
        assert!(calculate_abnormal_result(&ferritin, 40, "F", &index).unwrap().is_abnormal);
    }

    #[test]
    fn name_fallback_is_never_abnormal() {
        let index = load_test();
        let vitd = obs("VITD", "Vitamin D", 1.0, "nmol/L", None);

        let result = calculate_abnormal_result(&vitd, 40, "M", &index).unwrap();
        assert!(!result.is_abnormal);
        assert_eq!(result.metric_name, "Vitamin D");
        assert_eq!(result.risk_percentage, 0);

        assert!(process_abnormal_results(&[vitd], 40, "M", &index).is_empty());
    }

    #[test]
    fn unknown_test_has_no_result() {
        let index = load_test();
        let psa = obs("PSA", "Prostate Specific Antigen", 9.0, "ng/mL", None);
        assert!(calculate_abnormal_result(&psa, 40, "M", &index).is_none());
    }

    #[test]
    fn empty_panel_produces_no_results() {
        assert!(process_abnormal_results(&[], 40, "M", &load_test()).is_empty());
    }

    #[test]
    fn health_status_boundaries() {
        assert_eq!(HealthStatus::from_score(59), HealthStatus::Poor);
        assert_eq!(HealthStatus::from_score(60), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_score(79), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_score(80), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(89), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(90), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(100), HealthStatus::Excellent);
    }

    #[test]
    fn health_assessment_from_counts() {
        let a = HealthAssessment::from_counts(6, 2);
        assert_eq!(a.score, 67);
        assert_eq!(a.status, HealthStatus::Fair);
        assert_eq!(a.normal_tests, 4);
        assert_eq!(a.abnormal_tests, 2);

        let empty = HealthAssessment::from_counts(0, 0);
        assert_eq!(empty.score, 100);
        assert_eq!(empty.status, HealthStatus::Excellent);
    }

    #[test]
    fn screens_full_message() {
        let index = load_test();
        let parsed = parse_oru_at(MESSAGE, today()).unwrap();
        let report = screen_parsed(parsed, &index, ScreeningOptions::default());

        assert_eq!(report.patient.age, Some(38));
        assert_eq!(report.observations.len(), 6);
        let codes: Vec<&str> = report
            .abnormal_results
            .iter()
            .map(|r| r.observation.code.as_str())
            .collect();
        assert_eq!(codes, vec!["GLU", "FERR"]);
        assert!(report.health_assessment.is_none());
        assert_eq!(report.high_count(), 1);
    }

    #[test]
    fn health_assessment_is_opt_in() {
        let index = load_test();
        let parsed = parse_oru_at(MESSAGE, today()).unwrap();
        let report = screen_parsed(
            parsed,
            &index,
            ScreeningOptions {
                health_assessment: true,
            },
        );
        let assessment = report.health_assessment.unwrap();
        assert_eq!(assessment.total_tests, 6);
        assert_eq!(assessment.abnormal_tests, 2);
        assert_eq!(assessment.score, 67);
    }

    #[test]
    fn parse_failure_propagates() {
        let err = screen_message("not hl7", &load_test(), ScreeningOptions::default()).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_MESSAGE");
    }
}
