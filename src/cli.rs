// SPDX-License-Identifier: MPL-2.0

//! CLI commands
//!
//! `record` writes one segment of synthetic test-pattern frames, which is
//! enough to verify the encoder, container, and lock-file plumbing on a
//! machine without a camera. `info` prints where segments would land.

use camlog::constants::CONTAINER_EXTENSION;
use camlog::{LogSession, SessionConfig, storage};
use chrono::Local;
use std::path::PathBuf;

/// Record `frames` synthetic frames into one segment.
pub fn record(
    width: u32,
    height: u32,
    fps: u32,
    frames: u64,
    camera: String,
    directory: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let directory = directory.unwrap_or_else(storage::log_root);
    std::fs::create_dir_all(&directory)?;

    let filename = format!(
        "{}_{}.{}",
        camera,
        Local::now().format("%Y-%m-%d_%H-%M-%S"),
        CONTAINER_EXTENSION
    );

    let mut config = SessionConfig::new(filename, camera, width, height);
    config.fps = fps;

    let mut session = LogSession::new(config)?;
    session.open(&directory)?;

    let frame_interval_ns = 1_000_000_000u64 / fps as u64;
    let (w, h) = (width as usize, height as usize);
    let mut y = vec![0u8; w * h];
    let u = vec![128u8; (w / 2) * (h / 2)];
    let v = vec![128u8; (w / 2) * (h / 2)];

    for n in 0..frames {
        // Moving diagonal luma gradient
        for row in 0..h {
            for col in 0..w {
                y[row * w + col] = ((row + col + n as usize * 4) % 256) as u8;
            }
        }
        session.encode(&y, &u, &v, width, height, n * frame_interval_ns)?;
    }

    let written = session.frame_count();
    let path = session
        .video_path()
        .map(PathBuf::from)
        .unwrap_or_default();
    session.close()?;

    println!("Recorded {} frames to {}", written, path.display());
    Ok(())
}

/// Print the resolved storage root and defaults.
pub fn info() -> Result<(), Box<dyn std::error::Error>> {
    println!("Storage root: {}", storage::log_root().display());
    println!(
        "Defaults: {} fps, {} container",
        camlog::constants::DEFAULT_FPS,
        camlog::constants::CONTAINER_FORMAT
    );
    Ok(())
}
