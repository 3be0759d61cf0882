use anyhow::Result;
use opencv::core::Size;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::core::{CropSaver, CropSession, SessionConfig};
use crate::decoder::{OpenCvSource, VideoSource};
use crate::renderer::HighGuiDisplay;

pub struct CropOptions {
    pub video_path: PathBuf,
    pub save_path: PathBuf,
    pub brightness: f64,
    pub seek_step: i32,
    pub display_width: i32,
    pub display_height: i32,
}

/// Key reference printed when the session starts.
fn key_help(seek_step: i32) -> String {
    format!(
        "   space: select / save   esc: cancel   i/p: -/+{} frames   q: quit\n   \
         while selecting: space/enter confirms, c cancels (Ctrl-C takes effect after the selection ends)",
        seek_step
    )
}

/// Opens the video and windows, then runs the crop loop until the user
/// quits, closes the window, hits Ctrl-C or the video ends.
///
/// Ctrl-C only clears the session's running flag, which the loop checks once
/// per iteration; during the blocking region selection it is picked up after
/// the selection returns.
pub fn run_crop(options: CropOptions) -> Result<()> {
    let source = OpenCvSource::open(&options.video_path)?;
    let display = HighGuiDisplay::new(source.frame_count())?;
    let saver = CropSaver::new(options.save_path, &options.video_path);

    println!(
        "\n🎬 {} ({} frames) → {}",
        options.video_path.display(),
        source.frame_count(),
        saver.dir().display()
    );
    println!("{}", key_help(options.seek_step));

    let config = SessionConfig {
        display_size: Size::new(options.display_width, options.display_height),
        brightness: options.brightness,
        seek_step: options.seek_step,
        ..SessionConfig::default()
    };
    let mut session = CropSession::new(source, display, saver, config);

    let running = session.running_flag();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })?;

    let start_time = Instant::now();
    let summary = session.run()?;
    let duration = start_time.elapsed();

    println!("\n✅ Session finished");
    println!("   • Frames shown: {}", summary.frames_shown);
    println!("   • Crops saved: {}", summary.saved.len());
    if summary.failed_saves > 0 {
        println!("   • Failed saves: {}", summary.failed_saves);
    }
    println!("   • Duration: {:.2}s", duration.as_secs_f64());

    Ok(())
}
