//! Atomic file replacement.

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Replace `path` with `contents` so that readers see either the old file or
/// the new one, never a partial write.
///
/// The data goes to a uniquely named sibling file first, is synced, and is
/// then renamed over the target. On Unix the file is created with mode 0600,
/// so it is never readable by others.
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    tokio::fs::create_dir_all(parent).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "authswap".to_string());
    let tmp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::now_v7()));

    let result = write_then_rename(&tmp_path, path, contents).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
    }
    result
}

async fn write_then_rename(tmp_path: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = create_private(tmp_path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(tmp_path, path).await?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "replaced file atomically");
    Ok(())
}

/// Create a new file that only the owner can read, before any byte is written.
async fn create_private(path: &Path) -> std::io::Result<tokio::fs::File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_parent_and_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("file.json");

        write_atomic(&path, b"first").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // No temporary files are left behind.
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn restricts_permissions_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        write_atomic(&path, b"{}").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn temporary_file_is_private_before_writing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join(".secret.json.tmp");
        let file = create_private(&tmp).await.unwrap();

        let mode = file.metadata().await.unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
        assert_eq!(std::fs::metadata(&tmp).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn refuses_to_reuse_an_existing_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join(".taken.tmp");
        std::fs::write(&tmp, b"x").unwrap();
        assert!(create_private(&tmp).await.is_err());
    }
}
