use anyhow::{anyhow, Context, Result};
use opencv::{core::Mat, prelude::*, videoio};
use std::path::Path;

/// Seekable, finite frame source driving the cropping session.
///
/// `position` is the index of the next frame `read_next` will return, so
/// right after a read it is one past the frame just consumed.
pub trait VideoSource {
    fn frame_count(&self) -> i32;
    fn position(&self) -> Result<i32>;
    /// Moves the read cursor; returns the position actually applied.
    fn seek(&mut self, index: i32) -> Result<i32>;
    /// `Ok(None)` once the stream is exhausted.
    fn read_next(&mut self) -> Result<Option<Mat>>;
    fn release(&mut self) -> Result<()>;
}

/// Clamps a seek target into `[0, frame_count - 1]`.
pub fn clamp_position(index: i32, frame_count: i32) -> i32 {
    index.clamp(0, (frame_count - 1).max(0))
}

#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub frame_count: i32,
    pub fps: f64,
    pub width: i32,
    pub height: i32,
}

pub struct OpenCvSource {
    capture: videoio::VideoCapture,
    info: VideoInfo,
    released: bool,
}

impl OpenCvSource {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("Video path is not valid UTF-8: {:?}", path))?;

        crate::utils::logger::debug(&format!("Opening video with OpenCV: {}", path_str));

        // CAP_ANY lets OpenCV pick the backend for the platform.
        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open video file: {}", path_str))?;

        if !capture.is_opened()? {
            let err_msg = format!("Failed to open video file: {}", path_str);
            crate::utils::logger::error(&err_msg);
            return Err(anyhow!(err_msg));
        }

        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)? as i32;
        if frame_count <= 0 {
            let err_msg = format!("Video reports no frames: {}", path_str);
            crate::utils::logger::error(&err_msg);
            return Err(anyhow!(err_msg));
        }

        let info = VideoInfo {
            frame_count,
            fps: capture.get(videoio::CAP_PROP_FPS)?,
            width: capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32,
            height: capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32,
        };

        crate::utils::logger::info(&format!(
            "Video opened: {} frames, {}x{} @ {:.2} fps",
            info.frame_count, info.width, info.height, info.fps
        ));

        Ok(Self {
            capture,
            info,
            released: false,
        })
    }

}

impl VideoSource for OpenCvSource {
    fn frame_count(&self) -> i32 {
        self.info.frame_count
    }

    fn position(&self) -> Result<i32> {
        Ok(self.capture.get(videoio::CAP_PROP_POS_FRAMES)? as i32)
    }

    fn seek(&mut self, index: i32) -> Result<i32> {
        let target = clamp_position(index, self.info.frame_count);
        if target != index {
            crate::utils::logger::debug(&format!("Seek {} clamped to {}", index, target));
        }
        self.capture
            .set(videoio::CAP_PROP_POS_FRAMES, target as f64)
            .with_context(|| format!("Failed to seek to frame {}", target))?;
        Ok(target)
    }

    fn read_next(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.capture.release()?;
            crate::utils::logger::debug("Video source released");
        }
        Ok(())
    }
}

impl Drop for OpenCvSource {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_position() {
        assert_eq!(clamp_position(-41, 100), 0);
        assert_eq!(clamp_position(0, 100), 0);
        assert_eq!(clamp_position(57, 100), 57);
        assert_eq!(clamp_position(99, 100), 99);
        assert_eq!(clamp_position(148, 100), 99);
        assert_eq!(clamp_position(5, 0), 0);
    }

    #[test]
    fn test_open_missing_video_fails_fast() {
        let err = OpenCvSource::open(Path::new("/definitely/not/here.mp4"))
            .err()
            .expect("opening a missing file must fail");
        assert!(err.to_string().contains("/definitely/not/here.mp4"));
    }
}
