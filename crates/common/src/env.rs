//! Environment/runtime helpers
//!
//! Sanity checks run at startup before the router is built.

use std::path::Path;

use tracing::warn;

/// Warn when the static directory or the HTML shell is missing.
///
/// Neither is fatal: the JSON API keeps working, only `/` and `/static/*` 404.
pub async fn ensure_env(static_dir: &str, index_template: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static assets directory not found; static assets may 404");
    }
    match tokio::fs::metadata(index_template).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => anyhow::bail!("{index_template} is not a file"),
        Err(_) => {
            warn!(%index_template, "index template not found; `/` will 404");
        }
    }
    if let Some(parent) = Path::new(index_template).parent() {
        if !parent.as_os_str().is_empty() && tokio::fs::metadata(parent).await.is_err() {
            warn!(dir = %parent.display(), "template directory not found");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_paths_only_warn() {
        let res = ensure_env("/nonexistent-static", "/nonexistent-templates/index.html").await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn template_pointing_at_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_string_lossy().to_string();
        let res = ensure_env(&path, &path).await;
        assert!(res.is_err());
    }
}
