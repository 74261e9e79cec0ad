use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    /// Input file, image or video does not exist or cannot be opened.
    #[error("resource not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A table is missing required columns or holds unparsable cells.
    #[error("malformed input in {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("empty region of interest selected")]
    EmptySelection,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error(transparent)]
    OpenCv(#[from] opencv::Error),

    #[error(transparent)]
    Model(#[from] candle_core::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VisionError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        VisionError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors that only cost the current item (one image, one subject) and should not end the run.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            VisionError::EmptySelection | VisionError::EmptyInput(_) | VisionError::MalformedInput { .. }
        )
    }
}
