pub mod saver;
pub mod session;
pub mod state;

pub use saver::CropSaver;
pub use session::{CropSession, SessionConfig};
