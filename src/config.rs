// SPDX-License-Identifier: MPL-2.0

//! Session configuration

use ffmpeg_next as ffmpeg;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BITRATE, DEFAULT_FPS};
use crate::errors::{LogError, LogResult};

/// Lossless, intra-frame-only codec selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodecKind {
    /// FFVHUFF - very fast, modest compression (default)
    #[default]
    Ffvhuff,
    /// FFV1 - slower, better compression
    Ffv1,
}

impl CodecKind {
    /// Display name for logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Ffvhuff => "ffvhuff",
            CodecKind::Ffv1 => "ffv1",
        }
    }

    pub(crate) fn id(self) -> ffmpeg::codec::Id {
        match self {
            CodecKind::Ffvhuff => ffmpeg::codec::Id::FFVHUFF,
            CodecKind::Ffv1 => ffmpeg::codec::Id::FFV1,
        }
    }
}

/// Fixed parameters of one camera logging stream
///
/// A session is constructed once per camera with these parameters and then
/// reused across many segments. Input dimensions describe the frames the
/// capture source delivers; output dimensions describe the stored video.
/// When they differ, every frame is rescaled before encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Segment filename within the target directory (e.g. "fcamera.mkv")
    pub filename: String,
    /// Logical camera channel identifier, used for logging only
    pub camera_id: String,
    /// Width of incoming frames
    pub in_width: u32,
    /// Height of incoming frames
    pub in_height: u32,
    /// Stored video width
    pub out_width: u32,
    /// Stored video height
    pub out_height: u32,
    /// Frame rate; also the codec and stream timebase denominator
    pub fps: u32,
    /// Target bitrate in bits per second (advisory for lossless codecs)
    pub bitrate: usize,
    /// Codec selection
    pub codec: CodecKind,
    /// When false, frames are encoded and counted but nothing is written
    /// to disk and no lock file is created
    pub persist: bool,
}

impl SessionConfig {
    /// Configuration with equal input and output dimensions and defaults
    /// for the remaining fields.
    pub fn new(
        filename: impl Into<String>,
        camera_id: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            filename: filename.into(),
            camera_id: camera_id.into(),
            in_width: width,
            in_height: height,
            out_width: width,
            out_height: height,
            fps: DEFAULT_FPS,
            bitrate: DEFAULT_BITRATE,
            codec: CodecKind::default(),
            persist: true,
        }
    }

    /// Store at a different resolution than the capture source delivers.
    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.out_width = width;
        self.out_height = height;
        self
    }

    /// Whether frames must be rescaled before encoding
    pub fn needs_scaling(&self) -> bool {
        self.in_width != self.out_width || self.in_height != self.out_height
    }

    /// Size in bytes of one packed I420 frame at output resolution
    pub fn scale_buffer_len(&self) -> usize {
        (self.out_width as usize * self.out_height as usize) * 3 / 2
    }

    /// Validate the configuration.
    ///
    /// 4:2:0 chroma subsampling requires even dimensions on both the input
    /// and output side.
    pub fn validate(&self) -> LogResult<()> {
        if self.filename.is_empty() {
            return Err(LogError::Configuration("empty segment filename".into()));
        }
        if self.fps == 0 {
            return Err(LogError::Configuration("frame rate must be nonzero".into()));
        }
        for (label, w, h) in [
            ("input", self.in_width, self.in_height),
            ("output", self.out_width, self.out_height),
        ] {
            if w == 0 || h == 0 {
                return Err(LogError::Configuration(format!(
                    "{} dimensions must be nonzero, got {}x{}",
                    label, w, h
                )));
            }
            if w % 2 != 0 || h % 2 != 0 {
                return Err(LogError::Configuration(format!(
                    "{} dimensions must be even for 4:2:0 data, got {}x{}",
                    label, w, h
                )));
            }
        }
        Ok(())
    }
}
