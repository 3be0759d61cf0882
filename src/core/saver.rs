use anyhow::{bail, Context, Result};
use opencv::{core::Mat, core::Vector, imgcodecs};
use std::path::{Path, PathBuf};

use crate::shared::constants;
use crate::utils::file_utils;
use crate::utils::time_utils::TickCounter;

/// Writes confirmed crops as `<video>_<tick>.jpg` into one folder.
pub struct CropSaver {
    dir: PathBuf,
    base_name: String,
    ticks: TickCounter,
}

impl CropSaver {
    pub fn new(dir: PathBuf, video: &Path) -> Self {
        Self {
            dir,
            base_name: file_utils::video_base_name(video),
            ticks: TickCounter::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for the next crop; never repeats within one saver.
    pub fn next_path(&mut self) -> Result<PathBuf> {
        let tick = self.ticks.next_tick()?;
        Ok(self.dir.join(format!(
            "{}_{}.{}",
            self.base_name,
            tick,
            constants::CROP_EXTENSION
        )))
    }

    pub fn save(&mut self, crop: &Mat) -> Result<PathBuf> {
        file_utils::ensure_dir(&self.dir)?;

        let path = self.next_path()?;
        let path_str = path.to_string_lossy().to_string();
        let written = imgcodecs::imwrite(&path_str, crop, &Vector::<i32>::new())
            .with_context(|| format!("Failed to write crop: {}", path_str))?;
        if !written {
            bail!("Image encoder refused to write crop: {}", path_str);
        }

        crate::utils::logger::info(&format!("Crop saved: {}", path_str));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC3};
    use opencv::prelude::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_next_path_pattern_and_uniqueness() {
        let mut saver = CropSaver::new(PathBuf::from("out"), Path::new("videos/drive.mp4"));

        let paths: Vec<PathBuf> = (0..500).map(|_| saver.next_path().unwrap()).collect();
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());

        let name = paths[0].file_name().unwrap().to_string_lossy().to_string();
        let tick = name
            .strip_prefix("drive_")
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .expect("name should be drive_<tick>.jpg");
        assert!(tick.parse::<i64>().is_ok());
        assert_eq!(paths[0].parent(), Some(Path::new("out")));
    }

    #[test]
    fn test_save_creates_folder_and_writes_jpeg() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("crops");
        let mut saver = CropSaver::new(dir.clone(), Path::new("clip.avi"));
        let crop =
            Mat::new_rows_cols_with_default(12, 20, CV_8UC3, Scalar::new(40.0, 90.0, 160.0, 0.0))
                .unwrap();

        let first = saver.save(&crop).unwrap();
        let second = saver.save(&crop).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(&dir));
        let loaded =
            imgcodecs::imread(&first.to_string_lossy(), imgcodecs::IMREAD_COLOR).unwrap();
        assert_eq!(loaded.rows(), 12);
        assert_eq!(loaded.cols(), 20);
    }

    #[test]
    fn test_save_reports_unusable_folder() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let mut saver = CropSaver::new(blocker.join("crops"), Path::new("clip.mp4"));
        let crop = Mat::new_rows_cols_with_default(2, 2, CV_8UC3, Scalar::all(0.0)).unwrap();

        assert!(saver.save(&crop).is_err());
    }
}
