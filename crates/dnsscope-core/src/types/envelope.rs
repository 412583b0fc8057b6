use super::AnalysisReport;
use serde::{Deserialize, Serialize};

/// Response envelope used when a report is handed to an outer transport.
///
/// Success: `{"success": true, "data": ...}`.
/// Failure: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether `data` is present
    pub success: bool,
    /// Payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Wrap a failure message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<AnalysisReport> {
    /// Wrap a report, mapping a whole-run failure to the error form.
    ///
    /// Partial failures embedded in the report still produce `success: true`.
    #[must_use]
    pub fn from_report(report: AnalysisReport) -> Self {
        match report.error {
            Some(error) => Self::err(error),
            None => Self::ok(report),
        }
    }
}
