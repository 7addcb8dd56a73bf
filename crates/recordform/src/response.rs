//! Response envelope for controller layers
//!
//! Endpoints built on this crate answer with `{status, message, data}`. The
//! envelope carries the HTTP status code to use but performs no I/O itself.

use serde::Serialize;

use crate::errors::FieldErrors;
use crate::serializer::Serializer;

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// JSON response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: ResponseStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip)]
    pub http_status: u16,
}

impl ApiResponse {
    /// 200 with data
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
            http_status: 200,
        }
    }

    /// 201 with data
    pub fn created(data: serde_json::Value) -> Self {
        Self {
            http_status: 201,
            ..Self::success(data)
        }
    }

    /// 400 carrying the per-field error report
    pub fn validation_failed(errors: &FieldErrors) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some("Validation failed".to_string()),
            data: Some(errors.to_json()),
            http_status: 400,
        }
    }

    /// 404 for a missing record
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(message, 404)
    }

    /// Error without data
    pub fn error(message: impl Into<String>, http_status: u16) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: None,
            http_status,
        }
    }

    /// Attach a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Envelope for a finished validation run: formatted cleaned data on
    /// success, the error report otherwise
    pub fn from_serializer(serializer: &Serializer<'_>) -> Self {
        if serializer.validate() {
            Self::success(serializer.data())
        } else {
            Self::validation_failed(serializer.errors())
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldError;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(json!({"id": 7})).with_message("Record created");
        assert_eq!(response.http_status, 200);
        assert_eq!(
            response.to_json(),
            json!({"status": "success", "message": "Record created", "data": {"id": 7}})
        );
    }

    #[test]
    fn test_created_status() {
        assert_eq!(ApiResponse::created(json!({})).http_status, 201);
    }

    #[test]
    fn test_validation_failed_envelope() {
        let mut errors = FieldErrors::new();
        errors.add("name", FieldError::missing());

        let response = ApiResponse::validation_failed(&errors);
        assert_eq!(response.http_status, 400);
        assert_eq!(
            response.to_json(),
            json!({
                "status": "error",
                "message": "Validation failed",
                "data": {"name": "This field is required."}
            })
        );
    }

    #[test]
    fn test_not_found_omits_data() {
        let response = ApiResponse::not_found("Movie 42 not found");
        assert_eq!(response.http_status, 404);
        assert_eq!(
            response.to_json(),
            json!({"status": "error", "message": "Movie 42 not found"})
        );
    }
}
