//! Writing finished images to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Create the output directory tree if needed.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

/// Write `bytes` to `dir/file_name` through a hidden temporary file, so a
/// reader never sees a partial image.
pub fn write_image(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    ensure_dir(dir)?;

    let final_path = dir.join(file_name);
    let temp_path = dir.join(format!(".{}.partial", file_name));

    fs::write(&temp_path, bytes)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, &final_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to move image to {}", final_path.display()));
    }

    info!("File {} generated", final_path.display());
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{list_files, temp_test_dir};

    #[test]
    fn test_write_creates_directories() {
        let dir = temp_test_dir();
        let target = dir.path().join("a").join("b");

        let path = write_image(&target, "x.png", b"data").unwrap();
        assert_eq!(path, target.join("x.png"));
        assert_eq!(fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_no_temporary_file_left() {
        let dir = temp_test_dir();
        write_image(dir.path(), "x.png", b"one").unwrap();
        write_image(dir.path(), "x.png", b"two").unwrap();

        assert_eq!(list_files(dir.path()), vec!["x.png".to_string()]);
        assert_eq!(fs::read(dir.path().join("x.png")).unwrap(), b"two");
    }
}
