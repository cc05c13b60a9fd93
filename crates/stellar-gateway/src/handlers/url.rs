use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, UrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use stellar_core::{CreateParams, RegistryError, ShortId, StorageError};
use tracing::debug;

/// A path segment that cannot be a short id names nothing stored.
fn parse_short_id(raw: String, path: &str) -> Result<ShortId> {
    ShortId::new(raw.as_str())
        .map_err(|_| AppError::new(RegistryError::NotFound(raw), path))
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>> {
    let Json(request) = request.map_err(|rejection| {
        AppError::new(
            RegistryError::InvalidInput(rejection.body_text()),
            uri.path(),
        )
    })?;

    let params = CreateParams {
        original_url: request.url,
        custom_alias: request.custom_alias,
    };

    let record = state
        .registry()
        .create(params)
        .await
        .map_err(|e| AppError::new(e, uri.path()))?;

    Ok(Json(UrlResponse::from_record(record, state.base_url())))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(short_id): Path<String>,
) -> Result<Response> {
    let short_id = parse_short_id(short_id, uri.path())?;

    let record = state
        .registry()
        .record_access(&short_id)
        .await
        .map_err(|e| AppError::new(e, uri.path()))?;

    let location = HeaderValue::try_from(record.original_url).map_err(|e| {
        AppError::new(
            RegistryError::StorageUnavailable(StorageError::InvalidData(format!(
                "stored URL for '{short_id}' is not a valid Location: {e}"
            ))),
            uri.path(),
        )
    })?;

    debug!(short_id = %short_id, click_count = record.click_count, "redirecting");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn stats_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(short_id): Path<String>,
) -> Result<Json<UrlResponse>> {
    let short_id = parse_short_id(short_id, uri.path())?;

    let record = state
        .registry()
        .resolve(&short_id)
        .await
        .map_err(|e| AppError::new(e, uri.path()))?;

    Ok(Json(UrlResponse::from_record(record, state.base_url())))
}
