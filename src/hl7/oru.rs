//! ORU^R01 extraction: patient identity plus numeric observations.
//!
//! Positions read per segment:
//!
//! | Segment | Field | Meaning                                   |
//! |---------|-------|-------------------------------------------|
//! | PID     | 3     | patient identifier list (component 1)     |
//! | PID     | 5     | patient name (`FAMILY^GIVEN^...`)         |
//! | PID     | 7     | date of birth `YYYYMMDD`                  |
//! | PID     | 8     | administrative sex                        |
//! | OBR     | 7     | observation date/time `YYYYMMDDHHMMSS`    |
//! | OBX     | 2     | value type (`NM`, `SN`, ...)              |
//! | OBX     | 3     | observation identifier (`CODE^NAME^...`)  |
//! | OBX     | 5     | observation value                         |
//! | OBX     | 6     | units (component 1)                       |
//! | OBX     | 7     | reference range text                      |

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::models::{Observation, PatientDetails};

use super::date::{calculate_age, format_hl7_date};
use super::segment::{Message, Segment, SegmentType};
use super::value::{parse_numeric, strip_comparators};
use super::ParseError;

/// Structured numeric value type; OBX-5 is `comparator^number`.
const VALUE_TYPE_STRUCTURED_NUMERIC: &str = "SN";

/// Output of a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedMessage {
    pub patient: PatientDetails,
    pub observations: Vec<Observation>,
}

/// Parse an ORU message, deriving the patient's age from today's date.
pub fn parse_oru(text: &str) -> Result<ParsedMessage, ParseError> {
    parse_oru_at(text, Local::now().date_naive())
}

/// Parse an ORU message, deriving the patient's age relative to `today`.
pub fn parse_oru_at(text: &str, today: NaiveDate) -> Result<ParsedMessage, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::MalformedMessage(
            "File content must be a non-empty string".into(),
        ));
    }

    let message = Message::parse(text);
    validate_structure(&message)?;

    let mut patient = PatientDetails::default();
    let mut observations = Vec::new();
    let mut current_timestamp = String::new();

    for segment in message.segments() {
        match segment.kind() {
            SegmentType::Pid => patient = parse_patient(segment, today),
            SegmentType::Obr => {
                current_timestamp = format_hl7_date(segment.field_or_empty(7), true);
            }
            SegmentType::Obx => {
                if let Some(observation) = parse_observation(segment, &current_timestamp) {
                    observations.push(observation);
                }
            }
            _ => {}
        }
    }

    if !patient.is_complete() {
        return Err(ParseError::IncompletePatient);
    }

    if observations.is_empty() {
        return Err(ParseError::NoObservations);
    }

    tracing::debug!(
        patient_id = %patient.id,
        observations = observations.len(),
        "ORU message parsed"
    );

    Ok(ParsedMessage {
        patient,
        observations,
    })
}

fn validate_structure(message: &Message) -> Result<(), ParseError> {
    if !message.contains(&SegmentType::Msh) {
        return Err(ParseError::MalformedMessage("Missing MSH segment".into()));
    }

    let has_results =
        message.contains(&SegmentType::Obx) || message.contains(&SegmentType::Obr);
    if !message.contains(&SegmentType::Pid) || !has_results {
        return Err(ParseError::MalformedMessage(
            "Missing required segments (PID and OBX/OBR)".into(),
        ));
    }

    Ok(())
}

fn parse_patient(segment: &Segment, today: NaiveDate) -> PatientDetails {
    let id = segment
        .field(3)
        .map(|f| f.first_component().to_string())
        .unwrap_or_default();
    let name = segment
        .field(5)
        .map(|f| f.join_first_component_pair())
        .unwrap_or_default();
    let raw_dob = segment.field_or_empty(7);

    PatientDetails {
        id,
        name,
        date_of_birth: format_hl7_date(raw_dob, false),
        gender: segment.field_or_empty(8).to_string(),
        age: calculate_age(raw_dob, today),
    }
}

/// Decode one OBX segment. `None` drops the observation without failing
/// the message.
fn parse_observation(segment: &Segment, date_time: &str) -> Option<Observation> {
    let value_type = segment.field_or_empty(2);
    let identifier = segment.field(3);
    let code = identifier.and_then(|f| f.component(1)).unwrap_or("");
    let name = identifier.and_then(|f| f.component(2)).unwrap_or("");

    if code.is_empty() || name.is_empty() || value_type.is_empty() {
        tracing::debug!(
            code,
            name,
            value_type,
            "Skipping observation without identifier or value type"
        );
        return None;
    }

    let raw_value = match segment.field(5) {
        Some(field) if value_type == VALUE_TYPE_STRUCTURED_NUMERIC && field.has_components() => {
            field.component(2).unwrap_or("")
        }
        Some(field) => field.as_str(),
        None => "",
    };

    let Some(value) = parse_numeric(&strip_comparators(raw_value)) else {
        tracing::debug!(code, raw_value, "Skipping observation with non-numeric value");
        return None;
    };

    let reference_range = segment
        .field(7)
        .map(|f| f.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Some(Observation {
        code: code.to_string(),
        name: name.to_string(),
        value,
        unit: segment
            .field(6)
            .map(|f| f.first_component().to_string())
            .unwrap_or_default(),
        reference_range,
        date_time: date_time.to_string(),
    })
}
