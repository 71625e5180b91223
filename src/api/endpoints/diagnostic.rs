//! Lab-result upload and screening.

use axum::body::Bytes;
use axum::extract::{Multipart, Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ProcessQuery, ProcessResponse};
use crate::config::parse_flag;
use crate::intelligence::{screen_message, AdvisoryMessages, ScreeningOptions};

/// Multipart field carrying the HL7 file.
const FILE_FIELD: &str = "file";

/// `POST {base}/diagnostic/process`: screen one uploaded ORU message.
pub async fn process(
    State(ctx): State<ApiContext>,
    Query(query): Query<ProcessQuery>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, ApiError> {
    let health_assessment = match query.assessment.as_deref() {
        Some(raw) => {
            parse_flag(raw, "assessment").map_err(|e| ApiError::BadRequest(e.to_string()))?
        }
        None => ctx.health_assessment,
    };

    let bytes = read_file_field(&mut multipart).await?.ok_or(ApiError::NoFile)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| ApiError::InvalidEncoding)?;

    tracing::debug!(bytes = bytes.len(), health_assessment, "Processing diagnostic file");

    let index = ctx.metrics.snapshot()?;
    let report = screen_message(text, &index, ScreeningOptions { health_assessment })?;

    Ok(Json(ProcessResponse {
        success: true,
        message: AdvisoryMessages::processed(&report.patient.name),
        data: report,
    }))
}

/// First `file` field's bytes; other fields are drained and ignored.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Bytes>, ApiError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if file.is_none() && field.name() == Some(FILE_FIELD) {
            file = Some(field.bytes().await?);
        }
    }
    Ok(file)
}
