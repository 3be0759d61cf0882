pub mod display;
pub mod processor;

pub use display::{Display, HighGuiDisplay};
pub use processor::FrameProcessor;
