use anyhow::Result;
use opencv::core::{Mat, Size};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::saver::CropSaver;
use super::state::{transition, Action, Event, KeyCommand, SessionState};
use crate::decoder::VideoSource;
use crate::renderer::{Display, FrameProcessor};
use crate::shared::constants;

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub display_size: Size,
    pub brightness: f64,
    pub seek_step: i32,
    pub poll_delay_ms: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            display_size: Size::new(constants::DISPLAY_WIDTH, constants::DISPLAY_HEIGHT),
            brightness: constants::DIM_BRIGHTNESS,
            seek_step: constants::SEEK_STEP,
            poll_delay_ms: constants::KEY_POLL_MS,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionSummary {
    pub frames_shown: u64,
    pub saved: Vec<PathBuf>,
    pub failed_saves: u32,
}

/// The interactive crop loop. Owns the video source and the windows and
/// releases both when `run` returns, whatever the exit path.
pub struct CropSession<S: VideoSource, D: Display> {
    source: S,
    display: D,
    processor: FrameProcessor,
    saver: CropSaver,
    config: SessionConfig,
    state: SessionState,
    /// Set while the session itself moves the slider or the read cursor;
    /// slider callbacks seen meanwhile are echoes, not user drags.
    programmatic_update: bool,
    /// Last frame read, at display resolution and undimmed.
    frame: Option<Mat>,
    crop: Option<Mat>,
    running: Arc<AtomicBool>,
    summary: SessionSummary,
}

impl<S: VideoSource, D: Display> CropSession<S, D> {
    pub fn new(source: S, display: D, saver: CropSaver, config: SessionConfig) -> Self {
        Self {
            source,
            display,
            processor: FrameProcessor::new(config.display_size, config.brightness),
            saver,
            config,
            state: SessionState::Playing,
            programmatic_update: false,
            frame: None,
            crop: None,
            running: Arc::new(AtomicBool::new(true)),
            summary: SessionSummary::default(),
        }
    }

    /// Flag that ends the loop at the next iteration once cleared.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    #[cfg(test)]
    fn state(&self) -> SessionState {
        self.state
    }

    pub fn run(&mut self) -> Result<SessionSummary> {
        crate::utils::logger::debug("Starting crop loop");

        let result = self.run_loop();
        let shutdown = self.shutdown();
        if let Err(e) = &result {
            crate::utils::logger::error(&format!("Crop loop failed: {:#}", e));
        }
        result?;
        shutdown?;

        crate::utils::logger::debug(&format!(
            "Crop loop ended. Frames: {}, Saved: {}, Failed: {}",
            self.summary.frames_shown,
            self.summary.saved.len(),
            self.summary.failed_saves
        ));
        Ok(std::mem::take(&mut self.summary))
    }

    fn run_loop(&mut self) -> Result<()> {
        while !self.state.is_finished() {
            if !self.running.load(Ordering::SeqCst) {
                self.apply(Event::Interrupted)?;
                break;
            }

            if !self.state.is_paused() {
                match self.source.read_next()? {
                    Some(frame) => {
                        self.frame = Some(self.processor.prepare(&frame)?);
                        self.summary.frames_shown += 1;
                        self.sync_slider()?;
                    }
                    None => {
                        crate::utils::logger::debug("End of video");
                        self.apply(Event::FrameExhausted)?;
                        break;
                    }
                }
            }

            let key = self.display.poll_key(self.config.poll_delay_ms)?;
            self.apply_slider_request()?;
            if let Some(command) = key.and_then(KeyCommand::from_code) {
                self.apply(Event::Key(command))?;
            }
            if self.state.is_finished() {
                break;
            }

            if let Some(frame) = &self.frame {
                self.display.show_frame(frame)?;
            }

            if !self.display.is_open()? {
                crate::utils::logger::debug("Video window closed");
                self.apply(Event::WindowClosed)?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, event: Event) -> Result<()> {
        let (next, action) = transition(self.state, event);
        if next != self.state {
            crate::utils::logger::debug(&format!(
                "{:?} --{:?}--> {:?}",
                self.state, event, next
            ));
        }
        self.state = next;
        self.perform(action)
    }

    fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            Action::None => Ok(()),
            Action::BeginSelection => self.select_region(),
            Action::ShowPreview => match &self.crop {
                Some(crop) => self.display.show_preview(crop),
                None => Ok(()),
            },
            Action::SaveCrop => self.save_crop(),
            Action::DiscardCrop => {
                self.crop = None;
                self.display.close_preview()
            }
            Action::SeekBack => self.seek_relative(-self.config.seek_step),
            Action::SeekForward => self.seek_relative(self.config.seek_step),
        }
    }

    /// Runs the blocking selection over a dimmed copy, then crops the
    /// undimmed frame.
    fn select_region(&mut self) -> Result<()> {
        let crop = match &self.frame {
            Some(frame) => {
                let dimmed = self.processor.dim(frame)?;
                let rect = self.display.select_region(&dimmed)?;
                crate::utils::logger::debug(&format!(
                    "Selected region x={} y={} w={} h={}",
                    rect.x, rect.y, rect.width, rect.height
                ));
                self.processor.crop(frame, rect)?
            }
            None => None,
        };

        match crop {
            Some(crop) => {
                self.crop = Some(crop);
                self.apply(Event::RegionSelected)
            }
            None => self.apply(Event::SelectionEmpty),
        }
    }

    fn save_crop(&mut self) -> Result<()> {
        let crop = self.crop.take();
        self.display.close_preview()?;

        if let Some(crop) = crop {
            match self.saver.save(&crop) {
                Ok(path) => {
                    println!("💾 Image {} saved", path.display());
                    self.summary.saved.push(path);
                }
                Err(e) => {
                    // Keep playing; the crop is lost but the session is not.
                    crate::utils::logger::error(&format!("Saving crop failed: {:#}", e));
                    eprintln!("⚠️  Could not save crop: {:#}", e);
                    self.summary.failed_saves += 1;
                }
            }
        }
        Ok(())
    }

    /// Offsets are relative to the last frame read, not the read cursor.
    fn seek_relative(&mut self, offset: i32) -> Result<()> {
        let current = self.source.position()?;
        self.seek_to(current.saturating_sub(1).saturating_add(offset))
    }

    fn seek_to(&mut self, target: i32) -> Result<()> {
        self.programmatic_update = true;
        let applied = self.source.seek(target);
        self.programmatic_update = false;

        let applied = applied?;
        crate::utils::logger::debug(&format!("Seek to {} (requested {})", applied, target));
        Ok(())
    }

    fn sync_slider(&mut self) -> Result<()> {
        let position = self.source.position()?;

        self.programmatic_update = true;
        let result = self
            .display
            .set_slider(position - 1)
            .and_then(|_| self.apply_slider_request());
        self.programmatic_update = false;
        result
    }

    fn apply_slider_request(&mut self) -> Result<()> {
        let Some(position) = self.display.take_slider_request() else {
            return Ok(());
        };
        if self.programmatic_update || self.state != SessionState::Playing {
            return Ok(());
        }
        self.seek_to(position)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.frame = None;
        self.crop = None;
        let released = self.source.release();
        let destroyed = self.display.destroy_all();
        released?;
        destroyed
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    #[cfg(test)]
    fn display(&self) -> &D {
        &self.display
    }
}
