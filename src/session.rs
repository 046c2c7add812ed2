// SPDX-License-Identifier: MPL-2.0

//! Per-camera logging session lifecycle
//!
//! A [`LogSession`] is constructed once per camera stream and reused across
//! many segments. `open` starts a segment (lock file, container, header),
//! `encode` feeds frames and drains packets into the container, `close`
//! finalizes the file and removes the lock. The codec instance and its
//! reusable frame outlive segments; the muxer and lock file live exactly as
//! long as one segment and are released on every exit path.
//!
//! All calls are blocking and must be serialized by the caller, typically
//! from one dedicated capture thread per camera.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, trace, warn};

use crate::config::SessionConfig;
use crate::constants::LOCK_SUFFIX;
use crate::errors::{LogError, LogResult};
use crate::lock::LockFile;
use crate::media::{SegmentMuxer, VideoEncoder};
use crate::scale;

/// State owned for the duration of one segment.
///
/// For a non-persisting session `muxer` and `lock` stay `None`: frames are
/// still encoded and counted, but nothing touches the disk.
struct Segment {
    muxer: Option<SegmentMuxer>,
    lock: Option<LockFile>,
    video_path: PathBuf,
    counter: u64,
}

/// One per-camera logging session
pub struct LogSession {
    config: SessionConfig,
    encoder: VideoEncoder,
    scale_buf: Option<Vec<u8>>,
    segment: Option<Segment>,
}

impl LogSession {
    /// Allocate the codec instance and frame buffer for this stream.
    ///
    /// The scaling buffer is allocated here iff input dimensions differ from
    /// output dimensions, sized for one packed I420 frame at output
    /// resolution, and never reallocated.
    pub fn new(config: SessionConfig) -> LogResult<LogSession> {
        config.validate()?;

        let encoder = VideoEncoder::new(&config)?;
        let scale_buf = config
            .needs_scaling()
            .then(|| vec![0u8; config.scale_buffer_len()]);

        info!(
            camera = %config.camera_id,
            filename = %config.filename,
            in_width = config.in_width,
            in_height = config.in_height,
            out_width = config.out_width,
            out_height = config.out_height,
            fps = config.fps,
            codec = config.codec.as_str(),
            persist = config.persist,
            "created logging session"
        );

        Ok(LogSession {
            config,
            encoder,
            scale_buf,
            segment: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a segment is currently open
    pub fn is_open(&self) -> bool {
        self.segment.is_some()
    }

    /// Packets written to the current segment; 0 when closed
    pub fn frame_count(&self) -> u64 {
        self.segment.as_ref().map_or(0, |s| s.counter)
    }

    /// Output file of the current segment, when one is open
    pub fn video_path(&self) -> Option<&Path> {
        self.segment.as_ref().map(|s| s.video_path.as_path())
    }

    /// Begin a segment in `directory`.
    ///
    /// Creates `directory/filename.lock`, then the container at
    /// `directory/filename` with one video stream and a written header, and
    /// resets the frame counter. On any failure after the lock was created,
    /// both the lock and a partially created container file are removed
    /// before the error is returned.
    ///
    /// Calling `open` on an already-open session closes the current segment
    /// first.
    pub fn open(&mut self, directory: &Path) -> LogResult<()> {
        if self.segment.is_some() {
            warn!(
                camera = %self.config.camera_id,
                "open called on an open session; closing current segment"
            );
            self.close()?;
        }

        let video_path = directory.join(&self.config.filename);
        let lock_path = directory.join(format!("{}{}", self.config.filename, LOCK_SUFFIX));

        if !self.config.persist {
            debug!(camera = %self.config.camera_id, "segment opened without persistence");
            self.segment = Some(Segment {
                muxer: None,
                lock: None,
                video_path,
                counter: 0,
            });
            return Ok(());
        }

        let lock = LockFile::acquire(&lock_path).map_err(|e| {
            LogError::Resource(format!("create lock file '{}': {}", lock_path.display(), e))
        })?;

        let muxer = match SegmentMuxer::open(&video_path, &self.encoder, self.config.fps) {
            Ok(muxer) => muxer,
            Err(e) => {
                // Transactional open: no partial container, no stale lock
                remove_if_present(&video_path);
                if let Err(lock_err) = lock.release() {
                    warn!(error = %lock_err, "failed to remove lock file after open failure");
                }
                return Err(e);
            }
        };

        info!(
            camera = %self.config.camera_id,
            path = %video_path.display(),
            "segment opened"
        );

        self.segment = Some(Segment {
            muxer: Some(muxer),
            lock: Some(lock),
            video_path,
            counter: 0,
        });
        Ok(())
    }

    /// Encode one packed I420 frame into the open segment.
    ///
    /// `width`/`height` must match the configured input dimensions. The
    /// frame's presentation timestamp is the current frame counter; the
    /// caller's capture `timestamp` is logged but does not reach the
    /// container. Every packet the encoder has ready is drained, rebased to
    /// the stream timebase, and written; the counter advances by one per
    /// written packet.
    ///
    /// Returns the counter value at entry. A would-block signal from the
    /// encoder during startup ends the drain without error.
    pub fn encode(
        &mut self,
        y: &[u8],
        u: &[u8],
        v: &[u8],
        width: u32,
        height: u32,
        timestamp: u64,
    ) -> LogResult<u64> {
        let segment = self
            .segment
            .as_mut()
            .ok_or_else(|| LogError::Resource("encode on a session with no open segment".into()))?;

        if width != self.config.in_width || height != self.config.in_height {
            return Err(LogError::Configuration(format!(
                "frame is {}x{}, session expects {}x{}",
                width, height, self.config.in_width, self.config.in_height
            )));
        }

        let (in_w, in_h) = (width as usize, height as usize);
        let chroma_len = (in_w / 2) * (in_h / 2);
        if y.len() < in_w * in_h || u.len() < chroma_len || v.len() < chroma_len {
            return Err(LogError::Configuration(format!(
                "input planes too small for a {}x{} frame",
                width, height
            )));
        }

        let entry = segment.counter;
        trace!(
            camera = %self.config.camera_id,
            timestamp,
            pts = entry,
            "submitting frame"
        );

        if let Some(buf) = self.scale_buf.as_mut() {
            let (out_w, out_h) = (
                self.config.out_width as usize,
                self.config.out_height as usize,
            );
            scale::scale_i420(y, u, v, in_w, in_h, buf, out_w, out_h);

            let (scaled_y, chroma) = buf.split_at(out_w * out_h);
            let (scaled_u, scaled_v) = chroma.split_at((out_w / 2) * (out_h / 2));
            self.encoder.submit(scaled_y, scaled_u, scaled_v, entry as i64)?;
        } else {
            self.encoder.submit(y, u, v, entry as i64)?;
        }

        while let Some(packet) = self.encoder.receive()? {
            if let Some(muxer) = segment.muxer.as_mut() {
                muxer.write(packet)?;
            }
            segment.counter += 1;
        }

        Ok(entry)
    }

    /// End the current segment.
    ///
    /// Writes the trailer, closes the container, and removes the lock file.
    /// A no-op returning `Ok` when no segment is open; the segment state and
    /// lock are cleared even when finalizing the container fails.
    pub fn close(&mut self) -> LogResult<()> {
        let Some(segment) = self.segment.take() else {
            return Ok(());
        };

        let mut result = Ok(());

        if let Some(muxer) = segment.muxer {
            if let Err(e) = muxer.finish() {
                error!(
                    path = %segment.video_path.display(),
                    error = %e,
                    "failed to finalize container"
                );
                result = Err(e);
            }
        }

        if let Some(lock) = segment.lock {
            if let Err(e) = lock.release() {
                warn!(error = %e, "failed to remove lock file");
                if result.is_ok() {
                    result = Err(LogError::Resource(format!("remove lock file: {}", e)));
                }
            }
        }

        if result.is_ok() {
            info!(
                camera = %self.config.camera_id,
                path = %segment.video_path.display(),
                frames = segment.counter,
                "segment closed"
            );
        }
        result
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        if self.segment.is_some() {
            warn!(
                camera = %self.config.camera_id,
                "session dropped while open; closing segment"
            );
            if let Err(e) = self.close() {
                error!(error = %e, "failed to close segment on drop");
            }
        }
    }
}

fn remove_if_present(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove partial file");
        }
    }
}
