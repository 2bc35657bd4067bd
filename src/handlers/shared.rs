use actix_web::{error::JsonPayloadError, web, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            code: None,
            message: None,
        }
    }

    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            code: None,
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    // Error response carrying a stable code for client tooling
    pub fn error_with_code(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            code: Some(code.to_string()),
            message: Some(message.to_string()),
        }
    }
}

/// JSON extractor config mapping malformed bodies onto `BAD_REQUEST`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Query extractor config mapping missing parameters onto `BAD_REQUEST`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::BadRequest(err.to_string()).into())
}
