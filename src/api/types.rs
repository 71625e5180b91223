//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::intelligence::MetricStore;
use crate::models::ScreeningReport;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub metrics: Arc<MetricStore>,
    /// Whether reports carry a health assessment unless the request says
    /// otherwise.
    pub health_assessment: bool,
}

impl ApiContext {
    pub fn new(metrics: Arc<MetricStore>, health_assessment: bool) -> Self {
        Self {
            metrics,
            health_assessment,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response shapes
// ═══════════════════════════════════════════════════════════

/// Query string of `POST {base}/diagnostic/process`.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessQuery {
    pub assessment: Option<String>,
}

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    pub data: ScreeningReport,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub metrics_loaded: usize,
    pub version: &'static str,
}
