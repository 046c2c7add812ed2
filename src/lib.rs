// SPDX-License-Identifier: MPL-2.0

//! Camlog - per-camera lossless video logging
//!
//! This library records a continuous stream of raw planar-YUV frames from one
//! camera into losslessly encoded, timestamped Matroska segments, one file per
//! open/close cycle. While a segment is being written, a `.lock` sentinel file
//! next to it signals the in-progress write to external tooling.
//!
//! # Architecture
//!
//! - [`session`]: Segment lifecycle (open/encode/close) and per-segment state
//! - [`media`]: Encoder and container-muxer adapters around FFmpeg
//! - [`scale`]: Filterless point-sampled I420 plane scaling
//! - [`lock`]: Advisory lock files marking an in-progress segment
//! - [`config`]: Session parameters and validation
//! - [`storage`]: Storage root resolution
//!
//! # Example
//!
//! ```ignore
//! let config = SessionConfig::new("fcamera.mkv", "camera0", 1920, 1080);
//! let mut session = LogSession::new(config)?;
//! session.open(&segment_dir)?;
//! session.encode(&y, &u, &v, 1920, 1080, ts)?;
//! session.close()?;
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod lock;
pub mod media;
pub mod scale;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::{CodecKind, SessionConfig};
pub use errors::{LogError, LogResult};
pub use session::LogSession;
