//! Atomic file writes with locking

use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use tempfile::Builder;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Each call writes its own uniquely named temp file beside the target and
/// renames it into place, so readers never observe a partial document and
/// concurrent writers never share a temp file. The temp file is removed on
/// every failure.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::invalid_location(path.display().to_string(), "no parent directory"))?;
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );

    let mut temp_file = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;
    let temp_path = temp_file.path().to_path_buf();

    temp_file
        .as_file()
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .as_file()
        .unlock()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    // On failure the returned handle is dropped, which deletes the temp file
    temp_file
        .persist(path)
        .map_err(|e| Error::io(path, e.error))?;

    Ok(())
}

/// Whether a directory entry is a temp file left by [`write_atomic`].
pub fn is_temp_artifact(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn temp_artifacts(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| is_temp_artifact(&e.file_name().to_string_lossy()))
            .count()
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.json");
        fs::write(&path, "{}").unwrap();

        write_atomic(&path, br#"{"Name":"P"}"#).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"Name":"P"}"#);
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.json");
        write_atomic(&path, b"{}").unwrap();

        assert_eq!(temp_artifacts(temp.path()), 0);
    }

    #[test]
    fn test_write_atomic_concurrent_writers_never_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.json");
        let long = format!("{{\"Name\":\"{}\"}}", "x".repeat(200));
        let short = "{}".to_string();

        for _ in 0..20 {
            std::thread::scope(|scope| {
                for i in 0..4 {
                    let content = if i % 2 == 0 { long.clone() } else { short.clone() };
                    let path = &path;
                    scope.spawn(move || write_atomic(path, content.as_bytes()).unwrap());
                }
            });
            let stored = fs::read_to_string(&path).unwrap();
            assert!(stored == long || stored == short, "corrupt content: {stored}");
        }
        assert_eq!(temp_artifacts(temp.path()), 0);
    }

    #[test]
    fn test_write_atomic_missing_parent_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("project.json");
        assert!(write_atomic(&path, b"{}").is_err());
    }
}
