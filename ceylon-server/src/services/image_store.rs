//! Content-addressed image storage
//!
//! Uploaded images are validated (extension, magic bytes, decodable, size)
//! and written once under `<upload_dir>/<sha256>.<ext>`. The stored path is
//! what listings reference: `/uploads/<sha256>.<ext>`.

use image::ImageFormat;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted file extensions
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// URL prefix under which stored images are served
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Result of a successful store
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Public relative path, e.g. `/uploads/ab12….png`
    pub path: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate one upload without writing it; returns the canonical extension
    pub fn check(&self, original_name: Option<&str>, data: &[u8]) -> AppResult<&'static str> {
        validate_image(upload_name(original_name)?, data)
    }

    /// Validate and store one uploaded file
    pub async fn store(&self, original_name: Option<&str>, data: &[u8]) -> AppResult<StoredImage> {
        let original_name = upload_name(original_name)?;
        let ext = validate_image(original_name, data)?;

        let hash = calculate_hash(data);
        let filename = format!("{hash}.{ext}");
        let file_path = self.dir.join(&filename);

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to create upload directory: {e}"),
            )
        })?;

        if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
            tracing::info!(original_name, existing_file = %filename, "Duplicate image detected, reusing stored file");
        } else {
            tokio::fs::write(&file_path, data).await.map_err(|e| {
                AppError::with_message(ErrorCode::FileStorageFailed, format!("Failed to save file: {e}"))
            })?;
            tracing::info!(original_name, size = data.len(), hash = %hash, "Image stored");
        }

        Ok(StoredImage {
            path: format!("{PUBLIC_PREFIX}/{filename}"),
            filename,
            original_name: original_name.to_string(),
            size: data.len(),
        })
    }

    /// Resolve a served filename inside the store; `None` on traversal attempts
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return None;
        }
        Some(self.dir.join(filename))
    }
}

fn upload_name(original_name: Option<&str>) -> AppResult<&str> {
    original_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::NoFilename))
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Check size, extension and content; returns the canonical extension
fn validate_image(filename: &str, data: &[u8]) -> AppResult<&'static str> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    let detected = image::guess_format(data).map_err(|_| {
        AppError::with_message(ErrorCode::InvalidImageFile, "File content is not an image")
    })?;
    let canonical = match detected {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        other => {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Unsupported image content: {other:?}"),
            ));
        }
    };
    let ext_canonical = if ext == "jpeg" { "jpg" } else { ext.as_str() };
    if ext_canonical != canonical {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("File extension .{ext} does not match {canonical} content"),
        ));
    }

    image::load_from_memory_with_format(data, detected).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image file: {e}"))
    })?;

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(2, 2);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_store_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let data = png_bytes();

        let first = store.store(Some("beach.png"), &data).await.unwrap();
        let second = store.store(Some("same-beach.PNG"), &data).await.unwrap();

        assert_eq!(first.path, second.path);
        assert!(first.path.starts_with("/uploads/"));
        assert!(first.path.ends_with(".png"));
        assert_eq!(first.filename.len(), 64 + 4);
        assert!(dir.path().join(&first.filename).exists());
    }

    #[test]
    fn test_rejections() {
        let png = png_bytes();
        let code = |name: &str, data: &[u8]| validate_image(name, data).unwrap_err().code;

        assert_eq!(code("a.png", &[]), ErrorCode::EmptyFile);
        assert_eq!(code("a.gif", &png), ErrorCode::UnsupportedFileFormat);
        assert_eq!(code("a.jpg", &png), ErrorCode::InvalidImageFile);
        assert_eq!(code("a.png", b"not an image at all"), ErrorCode::InvalidImageFile);

        let huge = vec![0u8; MAX_FILE_SIZE + 1];
        assert_eq!(code("a.png", &huge), ErrorCode::FileTooLarge);
    }

    #[tokio::test]
    async fn test_missing_filename() {
        let store = ImageStore::new(std::env::temp_dir());
        let err = store.store(None, &png_bytes()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NoFilename);
    }

    #[test]
    fn test_resolve_blocks_traversal() {
        let store = ImageStore::new("uploads");
        assert!(store.resolve("../secret.db").is_none());
        assert!(store.resolve("a/b.png").is_none());
        assert!(store.resolve("").is_none());
        assert_eq!(store.resolve("x.png"), Some(PathBuf::from("uploads/x.png")));
    }
}
