pub const APP_NAME: &str = "roicrop";

pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const MAIN_WINDOW: &str = "Video";
pub const PREVIEW_WINDOW: &str = "Cropped Preview";
pub const SEEK_TRACKBAR: &str = "Seek";

pub const DISPLAY_WIDTH: i32 = 1920;
pub const DISPLAY_HEIGHT: i32 = 1080;

/// Key poll timeout; also caps playback at roughly 30 fps.
pub const KEY_POLL_MS: i32 = 33;

pub const SEEK_STEP: i32 = 50;
pub const MAX_SEEK_STEP: i32 = 100_000;
pub const DIM_BRIGHTNESS: f64 = 0.8;

pub const CROP_DIR_NAME: &str = "cropped_images";
pub const CROP_EXTENSION: &str = "jpg";
pub const FALLBACK_VIDEO_NAME: &str = "video";

pub const KEY_SPACE: i32 = 32;
pub const KEY_ESC: i32 = 27;
pub const KEY_SEEK_BACK: i32 = b'i' as i32;
pub const KEY_SEEK_FORWARD: i32 = b'p' as i32;
pub const KEY_QUIT: i32 = b'q' as i32;
