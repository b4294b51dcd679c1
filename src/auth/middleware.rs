use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::pipeline::CurrentUser;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

impl From<AuthUser> for CurrentUser {
    fn from(user: AuthUser) -> Self {
        CurrentUser {
            id: user.id,
            email: user.email,
        }
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_token(token, &state.config)?.claims;

    let auth_user = AuthUser {
        id: claims.sub,
        email: if claims.email.is_empty() {
            None
        } else {
            Some(claims.email)
        },
    };

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}
