use anyhow::{Context, Result};
use opencv::{
    core::{Mat, Rect},
    highgui,
};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::shared::constants;

/// Window surface the session draws into and reads input from.
pub trait Display {
    fn show_frame(&mut self, frame: &Mat) -> Result<()>;
    fn show_preview(&mut self, crop: &Mat) -> Result<()>;
    fn close_preview(&mut self) -> Result<()>;
    /// Moves the seek slider. Any resulting callback is reported through
    /// `take_slider_request` like a user drag would be.
    fn set_slider(&mut self, position: i32) -> Result<()>;
    /// Position the slider was last moved to, if it moved since the last call.
    fn take_slider_request(&mut self) -> Option<i32>;
    /// Waits up to `delay_ms` for a key; returns the low byte of the key
    /// code, or `None` on timeout.
    fn poll_key(&mut self, delay_ms: i32) -> Result<Option<i32>>;
    /// Blocking rectangle selection drawn over `frame`.
    fn select_region(&mut self, frame: &Mat) -> Result<Rect>;
    fn is_open(&self) -> Result<bool>;
    fn destroy_all(&mut self) -> Result<()>;
}

const NO_REQUEST: i32 = -1;

/// OpenCV highgui implementation: main "Video" window with a "Seek"
/// trackbar, plus the transient "Cropped Preview" window.
pub struct HighGuiDisplay {
    slider_request: Arc<AtomicI32>,
    preview_open: bool,
    destroyed: bool,
}

impl HighGuiDisplay {
    pub fn new(frame_count: i32) -> Result<Self> {
        highgui::named_window(constants::MAIN_WINDOW, highgui::WINDOW_AUTOSIZE)
            .context("Failed to create video window")?;

        let slider_request = Arc::new(AtomicI32::new(NO_REQUEST));
        let request = slider_request.clone();
        highgui::create_trackbar(
            constants::SEEK_TRACKBAR,
            constants::MAIN_WINDOW,
            None,
            frame_count,
            Some(Box::new(move |pos| {
                request.store(pos, Ordering::SeqCst);
            })),
        )
        .context("Failed to create seek trackbar")?;

        crate::utils::logger::debug(&format!(
            "Display created: trackbar range 0..={}",
            frame_count
        ));

        Ok(Self {
            slider_request,
            preview_open: false,
            destroyed: false,
        })
    }
}

impl Display for HighGuiDisplay {
    fn show_frame(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(constants::MAIN_WINDOW, frame)?;
        Ok(())
    }

    fn show_preview(&mut self, crop: &Mat) -> Result<()> {
        highgui::imshow(constants::PREVIEW_WINDOW, crop)?;
        self.preview_open = true;
        Ok(())
    }

    fn close_preview(&mut self) -> Result<()> {
        if self.preview_open {
            self.preview_open = false;
            highgui::destroy_window(constants::PREVIEW_WINDOW)?;
        }
        Ok(())
    }

    fn set_slider(&mut self, position: i32) -> Result<()> {
        highgui::set_trackbar_pos(constants::SEEK_TRACKBAR, constants::MAIN_WINDOW, position)?;
        Ok(())
    }

    fn take_slider_request(&mut self) -> Option<i32> {
        match self.slider_request.swap(NO_REQUEST, Ordering::SeqCst) {
            NO_REQUEST => None,
            pos => Some(pos),
        }
    }

    fn poll_key(&mut self, delay_ms: i32) -> Result<Option<i32>> {
        let key = highgui::wait_key(delay_ms)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(key & 0xFF))
    }

    fn select_region(&mut self, frame: &Mat) -> Result<Rect> {
        let rect = highgui::select_roi(constants::MAIN_WINDOW, frame, true, false, true)
            .context("Failed to select region")?;
        Ok(rect)
    }

    fn is_open(&self) -> Result<bool> {
        if self.destroyed {
            return Ok(false);
        }
        let visible = highgui::get_window_property(constants::MAIN_WINDOW, highgui::WND_PROP_VISIBLE)?;
        Ok(visible >= 1.0)
    }

    fn destroy_all(&mut self) -> Result<()> {
        if !self.destroyed {
            self.destroyed = true;
            self.preview_open = false;
            highgui::destroy_all_windows()?;
            crate::utils::logger::debug("All windows destroyed");
        }
        Ok(())
    }
}

impl Drop for HighGuiDisplay {
    fn drop(&mut self) {
        let _ = self.destroy_all();
    }
}
