//! Image upload handler

use axum::{Json, extract::State};

use crate::api::form::FormPayload;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::StoredImage;
use crate::utils::{AppError, AppResult};

/// POST /api/uploads - multipart with a single `file` part
pub async fn upload(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    form: FormPayload,
) -> AppResult<Json<StoredImage>> {
    let file = form
        .files("file")
        .next()
        .ok_or_else(|| AppError::validation("No 'file' field found. Field name must be 'file'"))?;

    let stored = state
        .images()
        .store(Some(&file.file_name), &file.data)
        .await?;

    tracing::info!(
        admin_id = current_user.id,
        path = %stored.path,
        original_name = %stored.original_name,
        "Image uploaded"
    );
    Ok(Json(stored))
}
