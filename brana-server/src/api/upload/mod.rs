//! Upload Routes
//!
//! Image upload for the admin forms, plus public access to images kept by
//! the local image store.

mod handler;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use http::header;

use crate::api::guarded;
use crate::auth::permissions::UPLOAD_IMAGES;
use crate::core::{ImageStoreKind, ServerState};
use crate::services::LocalImageStore;

/// Served image response
enum ImageFileResponse {
    Ok(Bytes, String),
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for ImageFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ImageFileResponse::Ok(content, mime) => (
                http::StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime),
                    (
                        header::CACHE_CONTROL,
                        "public, max-age=31536000, immutable".to_string(),
                    ),
                ],
                content,
            )
                .into_response(),
            ImageFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            ImageFileResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

/// GET /api/image/{filename}
///
/// 只服务本地存储; 外部图床的图片由图床直接提供
async fn serve_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> ImageFileResponse {
    if state.config.image_store != ImageStoreKind::Local {
        return ImageFileResponse::NotFound;
    }

    // Security check: prevent path traversal
    let store = LocalImageStore::new(state.config.images_dir(), "");
    let Some(file_path) = store.path_of(&filename) else {
        tracing::warn!(filename = %filename, "Rejected unsafe image filename");
        return ImageFileResponse::BadRequest("Invalid filename");
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&file_path)
                .first_or_octet_stream()
                .to_string();
            ImageFileResponse::Ok(content.into(), mime)
        }
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Image not found");
            ImageFileResponse::NotFound
        }
    }
}

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new()
        // Upload image API - upload:images
        .route(
            "/api/upload",
            guarded(
                UPLOAD_IMAGES,
                post(handler::upload).layer(DefaultBodyLimit::max(handler::MAX_BODY_SIZE)),
            ),
        )
        // Serve local images - public access
        .route("/api/image/{filename}", get(serve_image))
}
