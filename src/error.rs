use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::gateway::StoreError;
use crate::pipeline::{error_messages, Notification};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    /// A submit reached the pipeline without a signed-in user.
    #[error("Authentication required")]
    SignInRequired { notifications: Vec<Notification> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(ValidationErrors),

    /// The record store rejected a write. Carries the notifications the
    /// submit produced so the caller can show them.
    #[error("Store error: {error}")]
    Store {
        error: StoreError,
        notifications: Vec<Notification>,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized | AppError::SignInRequired { .. } => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::InvalidFields(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Store { error, .. } => (StatusCode::BAD_GATEWAY, error.message.clone()),
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let mut body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        });

        match &self {
            AppError::InvalidFields(errors) => {
                body["error"]["fields"] = json!(error_messages(errors));
            }
            AppError::Store { notifications, .. } | AppError::SignInRequired { notifications } => {
                body["notifications"] = json!(notifications);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::StoreErrorKind;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use validator::ValidationError;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_fields_lists_messages() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("required");
        err.message = Some("Workout type is required".into());
        errors.add("workoutType", err);

        let response = AppError::InvalidFields(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 422);
        assert_eq!(body["error"]["fields"]["workoutType"][0], "Workout type is required");
    }

    #[tokio::test]
    async fn test_store_error_is_bad_gateway_with_verbatim_message() {
        let response = AppError::Store {
            error: StoreError::new(StoreErrorKind::Constraint, "violates check constraint"),
            notifications: vec![Notification::destructive(
                "Something went wrong".into(),
                "violates check constraint".into(),
            )],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "violates check constraint");
        assert_eq!(body["notifications"][0]["variant"], "destructive");
    }

    #[tokio::test]
    async fn test_sign_in_required_keeps_notification() {
        let response = AppError::SignInRequired {
            notifications: vec![Notification::destructive(
                "Not signed in".into(),
                "Please sign in to add records.".into(),
            )],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 401);
        assert_eq!(body["notifications"][0]["title"], "Not signed in");
        assert_eq!(body["notifications"][0]["variant"], "destructive");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = AppError::Internal(anyhow::anyhow!("secret detail")).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Internal server error");
        assert!(body["error"].get("fields").is_none());
    }
}
