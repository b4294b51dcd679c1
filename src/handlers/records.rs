use axum::{
    extract::{Path, Query, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    Extension, Json,
};
use chrono::FixedOffset;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::config::offset_from_minutes;
use crate::dto::{
    FormFieldValue, FormQuery, FormTemplateResponse, RecordTypesResponse, SubmitRecordRequest,
    SubmitRecordResponse,
};
use crate::error::{AppError, AppResult};
use crate::i18n::{Catalog, Locale, Localize};
use crate::models::record::RecordKind;
use crate::pipeline::{NotificationLog, RecordModal, Session, SubmitOutcome};
use crate::AppState;

pub async fn record_types(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<RecordTypesResponse>> {
    let catalog = catalog_for(&headers, &state);

    let mut modal = RecordModal::new(|| {});
    modal.open();
    let view = modal
        .view(&catalog)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Record modal failed to open")))?;

    Ok(Json(RecordTypesResponse {
        title: view.title,
        description: view.description,
        placeholder: catalog.t("addRecordModal.selectPlaceholder"),
        options: view.options,
    }))
}

pub async fn form_template(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(kind): Path<String>,
    Query(query): Query<FormQuery>,
    headers: HeaderMap,
) -> AppResult<Json<FormTemplateResponse>> {
    query.validate().map_err(AppError::InvalidFields)?;
    let kind = parse_kind(&kind)?;
    let catalog = catalog_for(&headers, &state);
    let session = session_for(auth_user, query.utc_offset_minutes, &state)?;

    let mut modal = RecordModal::new(|| {});
    modal.open();
    modal.select(kind);
    modal.continue_to_form(session.now());

    let title = modal
        .view(&catalog)
        .map(|view| view.title)
        .unwrap_or_default();
    let form = modal
        .form()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("No form mounted for {}", kind)))?;

    Ok(Json(FormTemplateResponse {
        kind,
        title,
        fields: form
            .values()
            .into_iter()
            .map(|(name, value)| FormFieldValue {
                name,
                value: value.to_string(),
            })
            .collect(),
    }))
}

pub async fn submit_record(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SubmitRecordRequest>,
) -> AppResult<(StatusCode, Json<SubmitRecordResponse>)> {
    body.validate().map_err(AppError::InvalidFields)?;
    let kind = parse_kind(&kind)?;
    let catalog = catalog_for(&headers, &state);
    let session = session_for(auth_user, body.utc_offset_minutes, &state)?;

    let mut modal = RecordModal::new(|| tracing::debug!("Record modal closed"));
    modal.open();
    modal.select(kind);
    modal.continue_to_form(session.now());

    let form = modal
        .form_mut()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("No form mounted for {}", kind)))?;
    for (name, value) in body.fields {
        form.set(&name, value)
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let notifications = NotificationLog::new();
    let outcome = modal
        .submit(&session, &state.store, &notifications, &catalog)
        .await
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("No form mounted for {}", kind)))?;

    match outcome {
        SubmitOutcome::Persisted(receipt) => Ok((
            StatusCode::CREATED,
            Json(SubmitRecordResponse {
                receipt,
                notifications: notifications.take(),
            }),
        )),
        SubmitOutcome::Invalid(errors) => Err(AppError::InvalidFields(errors)),
        SubmitOutcome::Unauthenticated => Err(AppError::SignInRequired {
            notifications: notifications.take(),
        }),
        SubmitOutcome::Failed(error) => Err(AppError::Store {
            error,
            notifications: notifications.take(),
        }),
    }
}

fn parse_kind(raw: &str) -> AppResult<RecordKind> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Unknown record kind '{}'", raw)))
}

/// `Accept-Language` wins over the configured default.
fn catalog_for(headers: &HeaderMap, state: &AppState) -> Catalog {
    let locale = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(Locale::from_accept_language)
        .unwrap_or(state.config.default_locale);
    Catalog::new(locale)
}

fn session_for(
    auth_user: AuthUser,
    utc_offset_minutes: Option<i32>,
    state: &AppState,
) -> AppResult<Session> {
    let offset: FixedOffset = match utc_offset_minutes {
        Some(minutes) => offset_from_minutes(minutes)
            .ok_or_else(|| AppError::Validation("Offset must be within ±14 hours".into()))?,
        None => state.config.default_utc_offset,
    };
    Ok(Session::new(Some(auth_user.into()), offset))
}
