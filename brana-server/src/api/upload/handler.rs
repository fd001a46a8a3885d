//! Image Upload Handler
//!
//! Accepts PNG, JPEG and WebP, re-encodes everything as JPEG and stores it
//! under its content hash through the configured image store.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::PathBuf;

use crate::utils::{AppError, ErrorCode};
use crate::{CurrentUser, ServerState};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Request body limit: one file plus multipart framing
pub(super) const MAX_BODY_SIZE: usize = MAX_FILE_SIZE + 64 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for product photos (85% - keeps colors while controlling file size)
const JPEG_QUALITY: u8 = 85;

const STORED_CONTENT_TYPE: &str = "image/jpeg";

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
    /// Stored (re-encoded) size in bytes
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate size and extension before decoding
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext_lower,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    Ok(())
}

/// Decode and re-encode as JPEG
fn compress_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {}", e),
            )
        })?;
    }

    Ok(buffer)
}

/// POST /api/upload
pub async fn upload(
    State(state): State<ServerState>,
    current: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    // Find the file field
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(format!("Invalid multipart request: {}", e)))?
    {
        if f.name() == Some("file") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(
                f.bytes()
                    .await
                    .map_err(|e| AppError::invalid_request(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            "No 'file' field found. Field name must be 'file'",
        )
    })?;

    let filename = original_filename.ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;

    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Invalid file extension for: {}", filename),
            )
        })?;

    validate_image(&data, &ext)?;

    let compressed = compress_image(&data)?;
    let key = format!("{}.jpg", calculate_hash(&compressed));
    let size = compressed.len();

    let stored = state
        .image_store()
        .put(&key, compressed, STORED_CONTENT_TYPE)
        .await?;

    tracing::info!(
        user_id = %current.id,
        original_name = %filename,
        size = size,
        key = %stored.key,
        store = state.image_store().kind(),
        "Image uploaded successfully"
    );

    Ok(Json(UploadResponse {
        url: stored.url,
        key: stored.key,
        size,
        content_type: STORED_CONTENT_TYPE.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([244, 114, 182]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_validate_rejects_extension_and_size() {
        let err = validate_image(b"abc", "gif").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let big = vec![0u8; MAX_FILE_SIZE + 1];
        let err = validate_image(&big, "png").unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        assert!(validate_image(b"abc", "JPG").is_ok());
    }

    #[test]
    fn test_compress_outputs_jpeg() {
        let jpeg = compress_image(&png_bytes()).unwrap();
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_compress_rejects_garbage() {
        let err = compress_image(b"not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let h = calculate_hash(b"brana");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
