//! Basic types and helpers: errors, math re-exports, atomic file writes.

pub mod error;
pub mod math;

pub use error::{Error, Result};
pub use math::{dist2, Vec2, Vec3};

use std::io::Write as _;
use std::path::Path;

/// Write `contents` to `path` atomically: the bytes land in a named temp file
/// in the destination directory and are renamed over the target on success.
/// A failed write never leaves a partial file at `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let wrap = |source: std::io::Error| Error::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    tmp.write_all(contents).map_err(wrap)?;
    tmp.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_atomic_bad_dir() {
        let path = Path::new("/nonexistent-dir-for-sure/out.json");
        let err = write_atomic(path, b"x").unwrap_err();
        assert!(matches!(err, Error::WriteFailed { .. }));
    }
}
