//! Paste JSON handlers.

use super::{request_now, share_url};
use crate::{error::HttpError, models::paste::*, AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use pastelite_core::id::is_valid_id;

/// Create a new paste.
///
/// # Returns
/// `201` with the paste id and share URL.
///
/// # Errors
/// Returns `400` for malformed or invalid payloads and `503` when the store
/// cannot accept the write.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePasteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedPaste>), HttpError> {
    let Json(req) = payload?;

    if req.content.len() > state.config.max_paste_size {
        return Err(AppError::InvalidArgument(format!(
            "Paste size exceeds maximum of {} bytes",
            state.config.max_paste_size
        ))
        .into());
    }

    let now = request_now(&state.config, &headers)?;
    let paste = state
        .store
        .create(&req.content, req.ttl_seconds, req.max_views, now)?;
    tracing::info!(id = %paste.id, "Paste created");

    let url = share_url(&state.config, &headers, &paste.id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedPaste { id: paste.id, url }),
    ))
}

/// Fetch a paste by id, counting the view.
///
/// # Errors
/// Returns `404` when the paste never existed or is no longer live.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteView>, HttpError> {
    if !is_valid_id(&id) {
        return Err(AppError::NotFoundOrExpired.into());
    }
    let now = request_now(&state.config, &headers)?;
    state
        .store
        .read(&id, now)?
        .map(|paste| Json(PasteView::from(paste)))
        .ok_or_else(|| AppError::NotFoundOrExpired.into())
}

/// Report total and live paste counts.
pub async fn paste_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PasteStats>, HttpError> {
    let now = request_now(&state.config, &headers)?;
    Ok(Json(state.store.stats(now)?))
}
