// SPDX-License-Identifier: MPL-2.0

//! Matroska container muxing for one segment
//!
//! A [`SegmentMuxer`] owns the output container for exactly one segment:
//! allocate, register the single video stream, write the header, write
//! interleaved packets, write the trailer. Packet timestamps arrive in the
//! encoder's timebase and are rescaled into the stream timebase the muxer
//! settled on at header-write time.

use std::path::{Path, PathBuf};

use ffmpeg_next as ffmpeg;

use ffmpeg::format::{self, context::Output};
use ffmpeg::{Packet, Rational};
use tracing::debug;

use crate::constants::CONTAINER_FORMAT;
use crate::errors::{LogError, LogResult};
use crate::media::VideoEncoder;

/// One output container with a single registered video stream
pub struct SegmentMuxer {
    output: Output,
    stream_index: usize,
    stream_time_base: Rational,
    encoder_time_base: Rational,
    path: PathBuf,
}

impl std::fmt::Debug for SegmentMuxer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentMuxer")
            .field("stream_index", &self.stream_index)
            .field("stream_time_base", &self.stream_time_base)
            .field("encoder_time_base", &self.encoder_time_base)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SegmentMuxer {
    /// Allocate the container at `path`, register the video stream from the
    /// encoder's parameters with a `1/fps` timebase, and write the header.
    pub fn open(path: &Path, encoder: &VideoEncoder, fps: u32) -> LogResult<SegmentMuxer> {
        let mut output = format::output_as(&path, CONTAINER_FORMAT).map_err(|e| {
            LogError::Resource(format!("open container '{}': {}", path.display(), e))
        })?;

        let stream_index = {
            let mut stream = output
                .add_stream(encoder.codec())
                .map_err(|e| LogError::Resource(format!("add video stream: {}", e)))?;
            stream.set_time_base(Rational::new(1, fps as i32));
            stream.set_parameters(encoder.context());
            stream.index()
        };

        output
            .write_header()
            .map_err(|e| LogError::Resource(format!("write container header: {}", e)))?;

        // Matroska rewrites the stream timebase while writing the header;
        // packets must be rescaled into the post-header value.
        let stream_time_base = output
            .stream(stream_index)
            .ok_or_else(|| LogError::Resource("video stream vanished after header".into()))?
            .time_base();

        debug!(
            path = %path.display(),
            stream = stream_index,
            "container header written"
        );

        Ok(SegmentMuxer {
            output,
            stream_index,
            stream_time_base,
            encoder_time_base: encoder.time_base(),
            path: path.to_path_buf(),
        })
    }

    /// Rebase a packet from the encoder's timestamp domain into the
    /// stream's and write it interleaved.
    pub fn write(&mut self, mut packet: Packet) -> LogResult<()> {
        packet.set_stream(self.stream_index);
        packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
        packet
            .write_interleaved(&mut self.output)
            .map_err(|e| LogError::Resource(format!("write packet: {}", e)))
    }

    /// Write the trailer. Dropping the muxer closes the underlying IO.
    pub fn finish(mut self) -> LogResult<()> {
        self.output
            .write_trailer()
            .map_err(|e| LogError::Resource(format!("write trailer: {}", e)))?;
        debug!(path = %self.path.display(), "container finalized");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
