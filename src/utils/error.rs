use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::comment::model::ContentError;
use crate::config::service_name;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Unauthorized: {0}")]
    UnauthorizedError(String),

    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl CustomError {
    pub fn error_code(&self) -> &'static str {
        match *self {
            CustomError::UnauthorizedError(..) => "UNAUTHORIZED_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
            CustomError::ConflictError(..) => "CONFLICT_ERROR",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
        }
    }
}

/// Error code for a bare status, matching `CustomError::error_code` where
/// a variant exists for it.
pub fn status_error_code(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED_ERROR".to_string(),
        StatusCode::FORBIDDEN => "FORBIDDEN_ERROR".to_string(),
        StatusCode::BAD_REQUEST => "BAD_REQUEST_ERROR".to_string(),
        StatusCode::CONFLICT => "CONFLICT_ERROR".to_string(),
        StatusCode::NOT_FOUND => "NOT_FOUND_ERROR".to_string(),
        StatusCode::INTERNAL_SERVER_ERROR => "INTERNAL_SERVER_ERROR".to_string(),
        other => format!(
            "{}_ERROR",
            other
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_uppercase()
                .replace(' ', "_")
        ),
    }
}

impl From<ContentError> for CustomError {
    fn from(e: ContentError) -> Self {
        CustomError::ValidationError(e.to_string())
    }
}

impl From<mongodb::error::Error> for CustomError {
    fn from(e: mongodb::error::Error) -> Self {
        log::error!("database error: {}", e);
        CustomError::InternalServerError("Database operation failed".to_string())
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::UnauthorizedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.error_code(),
            "service": service_name(),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            CustomError::ForbiddenError("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CustomError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CustomError::UnauthorizedError("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn bare_status_codes_match_variant_codes() {
        assert_eq!(
            status_error_code(StatusCode::UNAUTHORIZED),
            CustomError::UnauthorizedError("x".into()).error_code()
        );
        assert_eq!(
            status_error_code(StatusCode::INTERNAL_SERVER_ERROR),
            CustomError::InternalServerError("x".into()).error_code()
        );
        assert_eq!(
            status_error_code(StatusCode::METHOD_NOT_ALLOWED),
            "METHOD_NOT_ALLOWED_ERROR"
        );
    }

    #[test]
    fn content_errors_are_validation_errors() {
        let err = CustomError::from(ContentError::TooLong(201));
        assert!(matches!(err, CustomError::ValidationError(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn renders_json_envelope() {
        let resp = CustomError::NotFoundError("Comment not found".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["httpStatusCode"], 404);
        assert_eq!(value["error"], "NOT_FOUND_ERROR");
        assert_eq!(value["message"], "Not Found: Comment not found");
    }
}
