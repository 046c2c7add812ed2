// SPDX-License-Identifier: MPL-2.0

//! Encoder and container-muxer adapters around FFmpeg

pub mod encoder;
pub mod muxer;

pub use encoder::VideoEncoder;
pub use muxer::SegmentMuxer;
