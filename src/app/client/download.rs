//! File content download and atomic saving
//!
//! Fetches raw file bytes by identifier and, when asked, writes them to disk
//! using the temp file + rename pattern.

use std::path::Path;

use reqwest::StatusCode;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::app::client::http::HttpHandler;
use crate::constants::files;
use crate::errors::{FetchError, FetchResult};

/// File download operations handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
    api_base: &'a Url,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler over the given HTTP handler and API base
    pub fn new(http_handler: &'a HttpHandler, api_base: &'a Url) -> Self {
        Self {
            http_handler,
            api_base,
        }
    }

    /// Build the media download URL for a file identifier
    pub fn media_url(api_base: &Url, file_id: &str) -> FetchResult<Url> {
        let invalid = |error: String| FetchError::InvalidUrl {
            url: api_base.to_string(),
            error,
        };

        let mut url = api_base.join("files/").map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .push(file_id);
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("supportsAllDrives", "true");

        Ok(url)
    }

    /// Download file content as bytes without saving to disk
    ///
    /// # Errors
    ///
    /// Returns a typed `FetchError` for 401/403/404, `ServerError` for other
    /// failing statuses, and transport errors after retries
    pub async fn download_file_content(&self, file_id: &str) -> FetchResult<Vec<u8>> {
        let url = Self::media_url(self.api_base, file_id)?;
        let response = self.http_handler.get_response(&url).await?;

        let status = response.status();
        if !status.is_success() {
            let file_id = file_id.to_string();
            return Err(match status {
                StatusCode::NOT_FOUND => FetchError::NotFound { file_id },
                StatusCode::FORBIDDEN => FetchError::Forbidden { file_id },
                StatusCode::UNAUTHORIZED => FetchError::Unauthorized { file_id },
                other => FetchError::ServerError {
                    status: other.as_u16(),
                },
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::Http)?;
        tracing::debug!("Downloaded {} bytes for file {}", bytes.len(), file_id);
        Ok(bytes.to_vec())
    }
}

/// Write bytes to `destination` atomically
///
/// # Errors
///
/// Returns `FetchError::FileExists` if the file exists and `force` is false,
/// or an I/O error if writing or renaming fails
pub async fn save_bytes(destination: &Path, bytes: &[u8], force: bool) -> FetchResult<()> {
    if destination.exists() && !force {
        return Err(FetchError::FileExists {
            path: destination.display().to_string(),
        });
    }

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = destination.with_extension(format!(
        "{}{}",
        destination
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or(""),
        files::TEMP_FILE_SUFFIX
    ));

    let write_result = async {
        let mut file = File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = write_result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(FetchError::Io(e));
    }

    tokio::fs::rename(&temp_path, destination)
        .await
        .map_err(|_e| FetchError::AtomicOperationFailed {
            temp_path: temp_path.clone(),
            final_path: destination.to_path_buf(),
        })?;

    tracing::info!("Saved image: {}", destination.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_media_url() {
        let base = Url::parse("https://www.googleapis.com/drive/v3/").unwrap();
        let url = DownloadHandler::media_url(&base, "ABC123").unwrap();
        assert_eq!(url.path(), "/drive/v3/files/ABC123");
        assert_eq!(url.query(), Some("alt=media&supportsAllDrives=true"));
    }

    #[test]
    fn test_media_url_escapes_identifier() {
        let base = Url::parse("https://www.googleapis.com/drive/v3/").unwrap();
        let url = DownloadHandler::media_url(&base, "ABC?usp=sharing").unwrap();
        assert_eq!(url.path(), "/drive/v3/files/ABC%3Fusp=sharing");
        assert_eq!(url.query(), Some("alt=media&supportsAllDrives=true"));
    }

    #[tokio::test]
    async fn test_save_bytes_writes_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("image.png");

        save_bytes(&path, b"\x89PNG", false).await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"\x89PNG");
        assert!(!path.with_extension("png.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_bytes_respects_force() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("image.jpg");
        tokio::fs::write(&path, b"old").await.unwrap();

        let result = save_bytes(&path, b"new", false).await;
        assert!(matches!(result, Err(FetchError::FileExists { .. })));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"old");

        save_bytes(&path, b"new", true).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"new");
    }
}
