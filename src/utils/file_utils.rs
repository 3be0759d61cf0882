use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants;

/// Creates `dir` (and any missing parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dir))
}

/// File stem of the video, used as the prefix of every saved crop.
pub fn video_base_name(video: &Path) -> String {
    video
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| constants::FALLBACK_VIDEO_NAME.to_string())
}

/// `<pictures>/cropped_images`, or `./cropped_images` when the platform has
/// no pictures directory.
pub fn default_save_dir() -> PathBuf {
    dirs::picture_dir()
        .map(|dir| dir.join(constants::CROP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(constants::CROP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_video_base_name() {
        assert_eq!(video_base_name(Path::new("clips/match_01.mp4")), "match_01");
        assert_eq!(video_base_name(Path::new("/tmp/archive.tar.mkv")), "archive.tar");
        assert_eq!(video_base_name(Path::new("noext")), "noext");
        assert_eq!(video_base_name(Path::new("")), constants::FALLBACK_VIDEO_NAME);
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Second call is a no-op.
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_fails_on_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, b"x").unwrap();

        let err = ensure_dir(&file.join("sub")).unwrap_err();
        assert!(err.to_string().contains("Failed to create output directory"));
    }

    #[test]
    fn test_default_save_dir_name() {
        assert!(default_save_dir().ends_with(constants::CROP_DIR_NAME));
    }
}
