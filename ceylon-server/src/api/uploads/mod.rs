//! Upload Routes
//!
//! - `GET /uploads/{filename}` serves stored images (public)
//! - `POST /api/uploads` stores one image and returns its path (admin)

mod handler;

use axum::{
    Router, body::Bytes, extract::{Path, State}, middleware, response::IntoResponse,
    routing::{get, post},
};
use http::header;

use crate::auth::{require_admin, require_auth};
use crate::core::ServerState;

/// Upload file response
enum UploadFileResponse {
    Ok { content: Bytes, mime: String },
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for UploadFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            UploadFileResponse::Ok { content, mime } => (
                http::StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
                ],
                content,
            )
                .into_response(),
            UploadFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            UploadFileResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

/// Serve uploaded file handler
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> UploadFileResponse {
    let Some(file_path) = state.images().resolve(&filename) else {
        return UploadFileResponse::BadRequest("Invalid filename");
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&file_path)
                .first_or_octet_stream()
                .to_string();
            UploadFileResponse::Ok {
                content: content.into(),
                mime,
            }
        }
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Uploaded file not found");
            UploadFileResponse::NotFound
        }
    }
}

/// Build upload router
pub fn router(state: &ServerState) -> Router<ServerState> {
    let upload_routes = Router::new()
        .route("/api/uploads", post(handler::upload))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/uploads/{filename}", get(serve_uploaded_file))
        .merge(upload_routes)
}
