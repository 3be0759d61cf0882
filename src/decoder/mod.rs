pub mod video;

pub use video::{OpenCvSource, VideoSource};
