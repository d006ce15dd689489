use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::errors::CoachError;

/// The current user's home directory
pub fn home_dir() -> Result<PathBuf, CoachError> {
    dirs::home_dir().ok_or(CoachError::NoHomeDir)
}

/// Expand a leading `~` against `home`. Other paths are returned unchanged.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Calculate total size of a directory (apparent bytes of regular files).
/// Unreadable entries count as zero.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/Users/swimmer");
        assert_eq!(expand_tilde("~", home), PathBuf::from("/Users/swimmer"));
        assert_eq!(
            expand_tilde("~/Documents", home),
            PathBuf::from("/Users/swimmer/Documents")
        );
        assert_eq!(expand_tilde("/Applications", home), PathBuf::from("/Applications"));
        assert_eq!(expand_tilde("~other/x", home), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        std::fs::write(tmp.path().join("a/b/deep.bin"), b"lane four").unwrap();
        assert_eq!(dir_size(tmp.path()), 9);

        std::fs::write(tmp.path().join("top.bin"), vec![0u8; 4096]).unwrap();
        assert_eq!(dir_size(tmp.path()), 4105);
    }

    #[test]
    fn test_dir_size_missing_path() {
        assert_eq!(dir_size(Path::new("/nonexistent/swimcoach/test")), 0);
    }
}
