mod core;
mod decoder;
mod renderer;
mod shared;
mod ui;
mod utils;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::shared::constants;
use crate::ui::interactive::{self, CropOptions};

#[derive(Parser)]
#[command(author, version, about = "Scrub a video, draw a region and save it as a JPEG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a video and crop regions from paused frames
    Crop {
        #[arg(short, long)]
        video: PathBuf,
        #[arg(short, long, help = "Folder for saved crops (default: <pictures>/cropped_images)")]
        save_path: Option<PathBuf>,
        #[arg(short, long, default_value_t = constants::DIM_BRIGHTNESS, help = "Brightness of the frame behind the selection box (0-1]")]
        brightness: f64,
        #[arg(long, default_value_t = constants::SEEK_STEP, value_parser = clap::value_parser!(i32).range(1..=constants::MAX_SEEK_STEP as i64))]
        seek_step: i32,
        #[arg(short = 'W', long, default_value_t = constants::DISPLAY_WIDTH, value_parser = clap::value_parser!(i32).range(1..))]
        width: i32,
        #[arg(short = 'H', long, default_value_t = constants::DISPLAY_HEIGHT, value_parser = clap::value_parser!(i32).range(1..))]
        height: i32,
    },
}

fn main() -> Result<()> {
    crate::utils::logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crop { video, save_path, brightness, seek_step, width, height } => {
            if !(brightness > 0.0 && brightness <= 1.0) {
                bail!("--brightness must be in (0, 1], got {}", brightness);
            }
            let save_path = save_path.unwrap_or_else(crate::utils::file_utils::default_save_dir);
            crate::utils::logger::info(&format!(
                "Crop session: video={:?} save_path={:?}",
                video, save_path
            ));

            interactive::run_crop(CropOptions {
                video_path: video,
                save_path,
                brightness,
                seek_step,
                display_width: width,
                display_height: height,
            })?;
        }
    }

    Ok(())
}
