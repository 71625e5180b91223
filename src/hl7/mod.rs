//! HL7 v2.x ORU message parsing.
//!
//! `segment` tokenizes raw text into typed segments and fields, `oru`
//! walks those segments once to extract the patient and the numeric
//! observations, `date` handles the positional `YYYYMMDD[HHMMSS]` values.

pub mod date;
pub mod oru;
pub mod segment;
pub mod value;

pub use date::{calculate_age, calculate_age_now, format_hl7_date, format_hl7_date_as, DateFormat};
pub use oru::{parse_oru, parse_oru_at, ParsedMessage};
pub use segment::{Field, Message, Segment, SegmentType};
pub use value::{parse_numeric, strip_comparators};

use thiserror::Error;

/// Fatal, message-level parse failures. Problems confined to a single
/// observation segment never surface here; that segment is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid HL7 file: {0}")]
    MalformedMessage(String),

    #[error("Invalid HL7 file: Missing required patient information")]
    IncompletePatient,

    #[error("Invalid HL7 file: No valid observations found")]
    NoObservations,
}

impl ParseError {
    /// Stable machine-readable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedMessage(_) => "MALFORMED_MESSAGE",
            Self::IncompletePatient => "INCOMPLETE_PATIENT",
            Self::NoObservations => "NO_OBSERVATIONS",
        }
    }
}
