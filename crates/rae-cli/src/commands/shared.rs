use std::path::PathBuf;

use rae_sync::Freshness;
use rae_webhooks::Upload;

/// Read every file before any remote call is made.
pub async fn read_uploads(paths: &[PathBuf]) -> anyhow::Result<Vec<Upload>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        uploads.push(Upload::from_path(path).await?);
    }
    Ok(uploads)
}

/// Warn when a list could not be refreshed.
pub fn note_freshness(freshness: Freshness, what: &str) {
    match freshness {
        Freshness::Live => {}
        Freshness::Stale => tracing::warn!("{what} could not be refreshed"),
        Freshness::Sample => tracing::warn!("{what} unavailable, showing sample data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn uploads_are_read_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for name in ["plan.pdf", "notes.txt"] {
            let path = dir.path().join(name);
            std::fs::File::create(&path)
                .unwrap()
                .write_all(name.as_bytes())
                .unwrap();
            paths.push(path);
        }
        let uploads = read_uploads(&paths).await.unwrap();
        assert_eq!(uploads[0].file_name, "plan.pdf");
        assert_eq!(uploads[0].mime.as_deref(), Some("application/pdf"));
        assert_eq!(uploads[1].bytes, b"notes.txt");
    }

    #[tokio::test]
    async fn missing_file_fails_before_upload() {
        let err = read_uploads(&[PathBuf::from("/nope/plan.pdf")]).await.unwrap_err();
        assert!(err.to_string().contains("/nope/plan.pdf"), "{err}");
    }
}
