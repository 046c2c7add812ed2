// SPDX-License-Identifier: MPL-2.0

//! Lossless video encoder adapter
//!
//! Wraps one opened FFmpeg encoder together with the reusable frame it
//! consumes. The codec instance lives for the whole session and is shared
//! across segments; only packets cross the boundary to the muxer.
//!
//! Encoders may buffer a few frames after startup before the first packet
//! appears. [`VideoEncoder::receive`] maps that would-block condition
//! (EAGAIN) to `None` so the drain loop in the session treats it as "no
//! packet yet" rather than a failure.

use ffmpeg_next as ffmpeg;

use ffmpeg::codec;
use ffmpeg::format::Pixel;
use ffmpeg::util::error::EAGAIN;
use ffmpeg::util::frame::video::Video as VideoFrame;
use ffmpeg::{Codec, Error as FfmpegError, Packet, Rational, encoder};
use tracing::debug;

use crate::config::SessionConfig;
use crate::errors::{LogError, LogResult};

/// One opened lossless encoder plus its reusable input frame
pub struct VideoEncoder {
    encoder: encoder::video::Encoder,
    codec: Codec,
    frame: VideoFrame,
    time_base: Rational,
    width: u32,
    height: u32,
}

impl VideoEncoder {
    /// Find, configure, and open the codec selected by `config`.
    ///
    /// A missing codec is a configuration error: the requested encoder was
    /// not compiled into the linked FFmpeg.
    pub fn new(config: &SessionConfig) -> LogResult<Self> {
        ffmpeg::init().map_err(|e| LogError::Resource(format!("ffmpeg init: {}", e)))?;

        let codec = encoder::find(config.codec.id()).ok_or_else(|| {
            LogError::Configuration(format!("encoder '{}' not available", config.codec.as_str()))
        })?;

        let time_base = Rational::new(1, config.fps as i32);

        let mut video = codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .map_err(|e| LogError::Configuration(format!("create encoder context: {}", e)))?;
        video.set_width(config.out_width);
        video.set_height(config.out_height);
        video.set_format(Pixel::YUV420P);
        video.set_time_base(time_base);
        video.set_frame_rate(Some(Rational::new(config.fps as i32, 1)));
        video.set_bit_rate(config.bitrate);

        let opened = video.open_as(codec).map_err(|e| {
            LogError::Configuration(format!("open '{}' encoder: {}", config.codec.as_str(), e))
        })?;

        let frame = VideoFrame::new(Pixel::YUV420P, config.out_width, config.out_height);

        debug!(
            codec = config.codec.as_str(),
            width = config.out_width,
            height = config.out_height,
            fps = config.fps,
            "encoder opened"
        );

        Ok(Self {
            encoder: opened,
            codec,
            frame,
            time_base,
            width: config.out_width,
            height: config.out_height,
        })
    }

    /// Codec handle, used when registering the container stream
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Timebase packets come out in (`1/fps`)
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /// Opened codec context, the source of stream parameters for the muxer
    pub(crate) fn context(&self) -> &encoder::video::Encoder {
        &self.encoder
    }

    /// Copy packed I420 planes into the reusable frame and submit it with
    /// presentation timestamp `pts` (in encoder timebase units).
    ///
    /// Planes must be packed at the encoder's output resolution: Y at
    /// `width * height` bytes, U and V at a quarter of that.
    ///
    /// Each call costs one copy of the frame: the packed planes are written
    /// row by row into the encoder's stride-padded frame, which the safe
    /// frame API owns. The caller's buffers are never aliased or retained.
    pub fn submit(&mut self, y: &[u8], u: &[u8], v: &[u8], pts: i64) -> LogResult<()> {
        let (w, h) = (self.width as usize, self.height as usize);
        self.fill_plane(0, y, w, h);
        self.fill_plane(1, u, w / 2, h / 2);
        self.fill_plane(2, v, w / 2, h / 2);
        self.frame.set_pts(Some(pts));

        self.encoder
            .send_frame(&self.frame)
            .map_err(|e| LogError::Encode(format!("send frame: {}", e)))
    }

    /// Pull the next ready packet.
    ///
    /// `Ok(None)` means the encoder has nothing ready right now (would-block
    /// during startup, or end of stream); only genuine codec failures are
    /// errors.
    pub fn receive(&mut self) -> LogResult<Option<Packet>> {
        let mut packet = Packet::empty();
        match self.encoder.receive_packet(&mut packet) {
            Ok(()) => Ok(Some(packet)),
            Err(FfmpegError::Other { errno }) if errno == EAGAIN => Ok(None),
            Err(FfmpegError::Eof) => Ok(None),
            Err(e) => Err(LogError::Encode(format!("receive packet: {}", e))),
        }
    }

    // Frame planes are stride-padded for alignment; copy row by row.
    fn fill_plane(&mut self, index: usize, src: &[u8], w: usize, h: usize) {
        let stride = self.frame.stride(index);
        let data = self.frame.data_mut(index);
        for (row, src_row) in src.chunks_exact(w).take(h).enumerate() {
            data[row * stride..row * stride + w].copy_from_slice(src_row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn test_config() -> SessionConfig {
        let mut config = SessionConfig::new("test.mkv", "camera0", 64, 48);
        config.fps = 20;
        config
    }

    fn test_planes(w: usize, h: usize) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let y = (0..w * h).map(|i| (i % 256) as u8).collect();
        let u = vec![128u8; (w / 2) * (h / 2)];
        let v = vec![64u8; (w / 2) * (h / 2)];
        (y, u, v)
    }

    #[test]
    fn test_open_default_codec() {
        let enc = VideoEncoder::new(&test_config()).unwrap();
        assert_eq!(enc.time_base(), Rational::new(1, 20));
        assert_eq!(enc.codec().id(), codec::Id::FFVHUFF);
    }

    #[test]
    fn test_submit_yields_packet_with_counter_pts() {
        let mut enc = VideoEncoder::new(&test_config()).unwrap();
        let (y, u, v) = test_planes(64, 48);

        // Intra-only codecs may still delay the first packet by a few
        // frames; submit until one appears.
        let mut first = None;
        for pts in 0..5 {
            enc.submit(&y, &u, &v, pts).unwrap();
            if let Some(packet) = enc.receive().unwrap() {
                first = Some(packet);
                break;
            }
        }
        let packet = first.expect("no packet after 5 submissions");
        assert_eq!(packet.pts(), Some(0));
    }

    #[test]
    fn test_receive_after_drain_is_would_block_not_error() {
        let mut enc = VideoEncoder::new(&test_config()).unwrap();
        let (y, u, v) = test_planes(64, 48);

        enc.submit(&y, &u, &v, 0).unwrap();
        while enc.receive().unwrap().is_some() {}

        // Drained and no EOF sent: the next receive would block
        assert!(enc.receive().unwrap().is_none());
    }
}
