use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_core::store::StoreError;
use dashboard_core::ValidationError;
use serde_json::{json, Value};

/// API error type that maps to JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(ValidationError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `{"error": {...}}` envelope sent to the client.
    pub fn body(&self) -> Value {
        let status = self.status();
        let (error_type, message) = match self {
            ApiError::NotFound(msg) => ("notFound", msg.clone()),
            ApiError::Unauthorized(msg) => ("unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => ("forbidden", msg.clone()),
            ApiError::Validation(ValidationError::Malformed(msg)) => ("badRequest", msg.clone()),
            ApiError::Validation(err) => ("validationError", err.to_string()),
            ApiError::Internal(_) | ApiError::Store(_) => {
                ("internalError", "An internal error occurred".to_string())
            }
        };

        let mut body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });
        if let ApiError::Validation(err) = self {
            body["error"]["fields"] = json!(err.field_messages());
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(_) | ApiError::Store(_) => {
                tracing::error!("Internal error: {self}");
            }
            ApiError::Validation(err) => tracing::debug!(error = %err, "dashboard rejected"),
            _ => {}
        }
        (self.status(), Json(self.body())).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::LayoutError;

    fn layout_error() -> ApiError {
        ApiError::Validation(ValidationError::Layout(vec![
            LayoutError::MissingRow {
                index: 1,
                module: "cpu".into(),
            },
            LayoutError::NonConsecutiveRows { rows: vec![1, 3] },
        ]))
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation(ValidationError::Malformed("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(layout_error().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_body_lists_every_field() {
        let body = layout_error().body();
        assert_eq!(body["error"]["statusCode"], json!(422));
        assert_eq!(body["error"]["type"], json!("validationError"));
        let fields = body["error"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], json!("modules.1.row"));
        assert_eq!(fields[1]["field"], json!("modules"));
    }

    #[test]
    fn internal_details_stay_out_of_the_body() {
        let body = ApiError::Internal("password=hunter2".into()).body();
        assert_eq!(body["error"]["message"], json!("An internal error occurred"));
        assert!(body["error"].get("fields").is_none());
    }
}
