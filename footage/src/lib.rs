//! Frame sources, previews and drawing on top of OpenCV.

pub mod annotate;
pub mod preview;
pub mod roi;
pub mod still;
pub mod video;

pub use annotate::{draw_box, model_caption, Palette};
pub use preview::{Flow, Preview, StopSignal};
pub use roi::{roi_image, sample_roi, select_roi, Roi};
pub use still::{load_image, save_frame};
pub use video::{FrameList, FrameSource, VideoSource};
