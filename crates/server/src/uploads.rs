//! Storage for uploaded photos and documents. Files land in the uploads
//! directory under a uuid-prefixed name and are served back at /uploads/.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::errors::ApiError;

/// Keep only characters that are safe in a filename; everything else
/// becomes an underscore.
fn sanitize(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[derive(Debug)]
pub struct StoredFile {
    pub filename: String,
    pub url: String,
}

/// Persist bytes under the uploads directory and return the public URL.
pub async fn store(uploads_dir: &str, original_name: &str, bytes: &[u8]) -> Result<StoredFile, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::Validation("uploaded file is empty".into()));
    }
    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize(original_name));
    let path = PathBuf::from(uploads_dir).join(&stored_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("cannot write upload {}: {e}", path.display())))?;
    Ok(StoredFile { filename: stored_name.clone(), url: format!("/uploads/{stored_name}") })
}

/// Best-effort removal of a previously stored file. A missing file is not
/// an error; the metadata row is already gone.
pub async fn unlink(uploads_dir: &str, url: &str) {
    let Some(name) = url.strip_prefix("/uploads/") else {
        return;
    };
    let path = PathBuf::from(uploads_dir).join(sanitize(name));
    if let Err(e) = tokio::fs::remove_file(&path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove stored file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components_and_odd_chars() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("foto del día.png"), "foto_del_d_a.png");
        assert_eq!(sanitize("report-2024_v1.pdf"), "report-2024_v1.pdf");
    }

    #[tokio::test]
    async fn store_and_unlink_round_trip() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let dir = dir.to_str().unwrap().to_string();

        let stored = store(&dir, "foto.png", b"png-bytes").await.unwrap();
        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.filename.ends_with("foto.png"));

        unlink(&dir, &stored.url).await;
        let path = PathBuf::from(&dir).join(&stored.filename);
        assert!(!path.exists());

        // unlinking again is a no-op
        unlink(&dir, &stored.url).await;
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let err = store("uploads", "x.png", b"").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
