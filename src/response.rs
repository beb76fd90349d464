// Uniform response envelope for the planner API
// Every endpoint answers {success, message?, data?, error?, errors?}

use serde::Serialize;

/// Envelope wrapping every JSON response, success and failure alike
///
/// `data` carries the payload on success; `errors` carries field-level
/// validation detail on 400s. Absent fields are omitted from the JSON.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    /// Successful response carrying a payload and a human-readable message
    pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    /// Successful acknowledgement with no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    /// Failure envelope with a client-safe message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: None,
            errors: None,
        }
    }

    /// Failure envelope with field-level validation detail
    pub fn failure_with_errors(message: impl Into<String>, errors: serde_json::Value) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: None,
            errors: Some(errors),
        }
    }
}
