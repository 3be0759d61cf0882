use anyhow::Result;
use opencv::{
    core::{Mat, Rect, Size},
    imgproc,
    prelude::*,
};

/// Pixel work for the session: display scaling, the selection dim effect
/// and cropping. Never mutates its inputs.
pub struct FrameProcessor {
    display_size: Size,
    brightness: f64,
}

impl FrameProcessor {
    pub fn new(display_size: Size, brightness: f64) -> Self {
        Self {
            display_size,
            brightness,
        }
    }

    /// Scales a decoded frame to the display resolution. Selection
    /// rectangles are expressed in this frame's coordinates.
    pub fn prepare(&self, frame: &Mat) -> Result<Mat> {
        if frame.size()? == self.display_size {
            return Ok(frame.try_clone()?);
        }
        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            self.display_size,
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;
        Ok(resized)
    }

    /// Darkened copy shown behind the selection box.
    pub fn dim(&self, frame: &Mat) -> Result<Mat> {
        let mut dimmed = Mat::default();
        frame.convert_to(&mut dimmed, -1, self.brightness, 0.0)?;
        Ok(dimmed)
    }

    /// Owned copy of `rect` from `frame`, clipped to the frame bounds.
    /// Returns `None` when nothing of positive area remains.
    pub fn crop(&self, frame: &Mat, rect: Rect) -> Result<Option<Mat>> {
        let rect = match clip_rect(rect, frame.size()?) {
            Some(rect) => rect,
            None => return Ok(None),
        };
        let view = Mat::roi(frame, rect)?;
        Ok(Some(view.try_clone()?))
    }
}

/// Intersection of `rect` with a `bounds`-sized image.
pub fn clip_rect(rect: Rect, bounds: Size) -> Option<Rect> {
    if rect.width <= 0 || rect.height <= 0 {
        return None;
    }
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.width).min(bounds.width);
    let y1 = (rect.y + rect.height).min(bounds.height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
}
