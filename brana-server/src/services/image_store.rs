//! Image Store
//!
//! 商品/横幅图片的存储后端：
//! - [`LocalImageStore`] - 写入 `{WORK_DIR}/images`，经 `/api/image/{filename}` 公开
//! - [`RemoteImageStore`] - 外部图床 (multipart 上传, 按 key 删除)
//!
//! 图片 key 即 URL 最后一段 (`{sha256}.jpg`)。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::utils::AppError;
use shared::error::ErrorCode;

/// Stored image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub key: String,
}

/// Image storage backend
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `key`
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<StoredImage, AppError>;

    /// Delete by key or by a url previously returned from `put`
    async fn delete(&self, url_or_key: &str) -> Result<(), AppError>;

    fn kind(&self) -> &'static str;
}

/// Last path segment of an image url, without query or fragment
pub fn image_key_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let key = path.rsplit('/').next()?;
    is_safe_filename(key).then(|| key.to_string())
}

/// Plain file name: no separators, no parent references, no hidden files
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Drop urls that are still referenced elsewhere
///
/// 内容寻址：相同内容的上传共享同一个 key，按 key 比较，取不到 key 时比较原始 url
pub fn unreferenced_images<I>(urls: Vec<String>, in_use: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let identity = |url: &str| image_key_from_url(url).unwrap_or_else(|| url.to_string());
    let in_use: HashSet<String> = in_use.into_iter().map(|u| identity(&u)).collect();
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| {
            let id = identity(url);
            !in_use.contains(&id) && seen.insert(id)
        })
        .collect()
}

/// Best-effort removal of hosted images; failures are logged, never retried
pub fn spawn_image_cleanup(store: Arc<dyn ImageStore>, urls: Vec<String>) {
    if urls.is_empty() {
        return;
    }
    tokio::spawn(async move {
        let mut deleted = 0usize;
        for url in &urls {
            match store.delete(url).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to delete hosted image");
                }
            }
        }
        tracing::info!(deleted, total = urls.len(), "Product images cleaned up");
    });
}

// =============================================================================
// Local
// =============================================================================

/// Images on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    /// 图片目录: {WORK_DIR}/images
    images_dir: PathBuf,
    /// 公开 URL 前缀 (可为空，生成相对 URL)
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(images_dir: PathBuf, public_base_url: impl Into<String>) -> Self {
        Self {
            images_dir,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn images_dir(&self) -> &PathBuf {
        &self.images_dir
    }

    /// Resolved path of a stored image, `None` for unsafe names
    pub fn path_of(&self, filename: &str) -> Option<PathBuf> {
        is_safe_filename(filename).then(|| self.images_dir.join(filename))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredImage, AppError> {
        let path = self.path_of(key).ok_or_else(|| {
            AppError::with_message(ErrorCode::FileStorageFailed, format!("Invalid image key: {}", key))
        })?;

        tokio::fs::create_dir_all(&self.images_dir).await.map_err(|e| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to create images directory: {}", e),
            )
        })?;

        // 内容寻址：同 key 即同内容，已存在则跳过写入
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tokio::fs::write(&path, &bytes).await.map_err(|e| {
                AppError::with_message(
                    ErrorCode::FileStorageFailed,
                    format!("Failed to save file: {}", e),
                )
            })?;
        }

        Ok(StoredImage {
            url: format!("{}/api/image/{}", self.public_base_url, key),
            key: key.to_string(),
        })
    }

    async fn delete(&self, url_or_key: &str) -> Result<(), AppError> {
        let key = image_key_from_url(url_or_key)
            .ok_or_else(|| AppError::validation(format!("Invalid image reference: {}", url_or_key)))?;
        let Some(path) = self.path_of(&key) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to delete {}: {}", key, e),
            )),
        }
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

// =============================================================================
// Remote
// =============================================================================

/// HTTP image host
#[derive(Debug, Clone)]
pub struct RemoteImageStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Image host upload response; `url` falls back to `{base_url}/{key}`
#[derive(Debug, Deserialize)]
struct HostUploadResponse {
    url: Option<String>,
    key: Option<String>,
}

impl RemoteImageStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn host_error(msg: impl Into<String>) -> AppError {
        AppError::with_message(ErrorCode::ImageHostError, msg)
    }
}

#[async_trait]
impl ImageStore for RemoteImageStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, AppError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(key.to_string())
            .mime_str(content_type)
            .map_err(|e| Self::host_error(format!("Invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("key", key.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&self.base_url)
            .header("X-API-Key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::host_error(format!("Image host unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::host_error(format!(
                "Image host rejected upload ({}): {}",
                status, body
            )));
        }

        let parsed: HostUploadResponse = response
            .json()
            .await
            .map_err(|e| Self::host_error(format!("Unexpected image host response: {}", e)))?;

        let key = parsed.key.unwrap_or_else(|| key.to_string());
        let url = parsed
            .url
            .unwrap_or_else(|| format!("{}/{}", self.base_url, key));
        Ok(StoredImage { url, key })
    }

    async fn delete(&self, url_or_key: &str) -> Result<(), AppError> {
        let key = image_key_from_url(url_or_key)
            .ok_or_else(|| AppError::validation(format!("Invalid image reference: {}", url_or_key)))?;

        let response = self
            .client
            .delete(format!("{}/{}", self.base_url, key))
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Self::host_error(format!("Image host unreachable: {}", e)))?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(Self::host_error(format!(
                "Image host refused delete of {} ({})",
                key, status
            )))
        }
    }

    fn kind(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_url() {
        assert_eq!(
            image_key_from_url("https://img.example.com/u/ab12.jpg?w=300").as_deref(),
            Some("ab12.jpg")
        );
        assert_eq!(image_key_from_url("/api/image/ab12.jpg").as_deref(), Some("ab12.jpg"));
        assert_eq!(image_key_from_url("ab12.jpg").as_deref(), Some("ab12.jpg"));
        assert_eq!(image_key_from_url("https://img.example.com/"), None);
        assert_eq!(image_key_from_url("../../etc/passwd").as_deref(), Some("passwd"));
    }

    #[test]
    fn test_unreferenced_images() {
        let urls = vec![
            "http://shop.test/api/image/a.jpg".to_string(),
            "http://shop.test/api/image/b.jpg".to_string(),
            "/api/image/b.jpg".to_string(),
            "http://shop.test/api/image/c.jpg".to_string(),
        ];
        // 另一个商品或横幅仍在用 a.jpg (不同前缀也算同一张)
        let in_use = vec!["/api/image/a.jpg".to_string()];
        assert_eq!(
            unreferenced_images(urls, in_use),
            vec![
                "http://shop.test/api/image/b.jpg".to_string(),
                "http://shop.test/api/image/c.jpg".to_string(),
            ]
        );
        assert!(unreferenced_images(vec!["x.png".to_string()], vec!["x.png".to_string()]).is_empty());
    }

    #[test]
    fn test_safe_filename() {
        assert!(is_safe_filename("ab12.jpg"));
        assert!(!is_safe_filename(".env"));
        assert!(!is_safe_filename("a/b.jpg"));
        assert!(!is_safe_filename("..\\x.jpg"));
        assert!(!is_safe_filename("a..b"));
        assert!(!is_safe_filename(""));
    }

    #[tokio::test]
    async fn test_local_put_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("images"), "http://shop.test/");

        let stored = store
            .put("abc.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(stored.url, "http://shop.test/api/image/abc.jpg");
        assert_eq!(stored.key, "abc.jpg");
        assert!(dir.path().join("images/abc.jpg").exists());

        store.delete(&stored.url).await.unwrap();
        assert!(!dir.path().join("images/abc.jpg").exists());

        // 已删除的图片再次删除不报错
        store.delete("abc.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_local_rejects_unsafe_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().to_path_buf(), "");
        assert!(store.put("../x.jpg", vec![1], "image/jpeg").await.is_err());
        assert!(store.path_of("..").is_none());
    }
}
