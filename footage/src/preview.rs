use opencv::{core::Mat, highgui};
use vision::Result;

pub const ESC_KEY: i32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Polled once per processed frame; a run ends as soon as it answers `Flow::Stop`.
pub trait StopSignal {
    fn poll(&self, frame: &Mat) -> Result<Flow>;

    fn finish(&self) -> Result<()> {
        Ok(())
    }
}

/// On-screen preview of processed frames; polls for ESC once per frame.
///
/// A headless preview shows nothing and never asks to stop.
pub struct Preview {
    window: String,
    enabled: bool,
}

impl Preview {
    pub fn new(window: impl Into<String>, enabled: bool) -> Self {
        Self {
            window: window.into(),
            enabled,
        }
    }

    pub fn headless() -> Self {
        Self::new(String::new(), false)
    }

    pub fn show(&self, frame: &Mat) -> Result<Flow> {
        if !self.enabled {
            return Ok(Flow::Continue);
        }

        highgui::imshow(&self.window, frame)?;
        if highgui::wait_key(1)? & 0xFF == ESC_KEY {
            log::info!("Stopped by user");
            return Ok(Flow::Stop);
        }

        Ok(Flow::Continue)
    }

    /// Shows `frame` and blocks until any key is pressed.
    pub fn show_and_wait(&self, frame: &Mat) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        highgui::imshow(&self.window, frame)?;
        highgui::wait_key(0)?;
        highgui::destroy_window(&self.window)?;

        Ok(())
    }

    pub fn close(&self) -> Result<()> {
        if self.enabled {
            highgui::destroy_all_windows()?;
        }

        Ok(())
    }
}

impl StopSignal for Preview {
    fn poll(&self, frame: &Mat) -> Result<Flow> {
        self.show(frame)
    }

    fn finish(&self) -> Result<()> {
        self.close()
    }
}
