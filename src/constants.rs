// SPDX-License-Identifier: MPL-2.0

//! Crate-wide constants

/// Container format used for every segment. Matroska tolerates truncated
/// files, which matters for recordings interrupted mid-segment.
pub const CONTAINER_FORMAT: &str = "matroska";

/// File extension matching [`CONTAINER_FORMAT`]
pub const CONTAINER_EXTENSION: &str = "mkv";

/// Suffix appended to the segment filename to form the lock-file name
pub const LOCK_SUFFIX: &str = ".lock";

/// Default capture frame rate
pub const DEFAULT_FPS: u32 = 20;

/// Default target bitrate in bits per second. Lossless codecs treat this as
/// advisory; it is carried through to the codec context regardless.
pub const DEFAULT_BITRATE: usize = 5_000_000;
