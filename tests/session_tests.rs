// SPDX-License-Identifier: MPL-2.0

//! End-to-end recording tests
//!
//! Each test drives a full open/encode/close cycle and then reopens the
//! written container with FFmpeg to check what actually landed on disk.

use camlog::{LogError, LogSession, SessionConfig};
use ffmpeg_next as ffmpeg;
use std::path::Path;

fn test_frame(w: u32, h: u32, seed: u8) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let (w, h) = (w as usize, h as usize);
    let y = (0..w * h)
        .map(|i| ((i / w + i % w) as u8).wrapping_add(seed))
        .collect();
    let u = vec![110u8; (w / 2) * (h / 2)];
    let v = vec![140u8; (w / 2) * (h / 2)];
    (y, u, v)
}

/// Open `path` as a container and return (stream count, packet count,
/// stored width, stored height).
fn probe(path: &Path) -> (usize, usize, u32, u32) {
    ffmpeg::init().unwrap();
    let mut ictx = ffmpeg::format::input(&path).unwrap();

    let stream_count = ictx.streams().count();
    let (width, height) = {
        let stream = ictx
            .streams()
            .best(ffmpeg::media::Type::Video)
            .expect("no video stream");
        let decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .unwrap()
            .decoder()
            .video()
            .unwrap();
        (decoder.width(), decoder.height())
    };
    let packet_count = ictx.packets().count();

    (stream_count, packet_count, width, height)
}

#[test]
fn test_record_forty_frames_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SessionConfig::new("fcamera.mkv", "road", 1920, 1080);
    config.fps = 20;

    let mut session = LogSession::new(config).unwrap();
    session.open(dir.path()).unwrap();
    assert!(dir.path().join("fcamera.mkv.lock").exists());

    for n in 0..40u64 {
        let (y, u, v) = test_frame(1920, 1080, n as u8);
        session.encode(&y, &u, &v, 1920, 1080, n * 50_000_000).unwrap();
    }
    assert_eq!(session.frame_count(), 40);
    session.close().unwrap();

    assert!(!dir.path().join("fcamera.mkv.lock").exists());

    let video = dir.path().join("fcamera.mkv");
    assert!(video.exists());
    let (streams, packets, width, height) = probe(&video);
    assert_eq!(streams, 1);
    assert_eq!(packets, 40);
    assert_eq!((width, height), (1920, 1080));
}

#[test]
fn test_downscaled_recording_stores_output_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let config =
        SessionConfig::new("dcamera.mkv", "driver", 1928, 1208).with_output_size(1920, 1080);

    let mut session = LogSession::new(config).unwrap();
    session.open(dir.path()).unwrap();

    let (y, u, v) = test_frame(1928, 1208, 9);
    session.encode(&y, &u, &v, 1928, 1208, 0).unwrap();
    session.close().unwrap();

    let (_, packets, width, height) = probe(&dir.path().join("dcamera.mkv"));
    assert_eq!(packets, 1);
    assert_eq!((width, height), (1920, 1080));
}

#[test]
fn test_lock_failure_creates_no_container() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");

    let mut session =
        LogSession::new(SessionConfig::new("fcamera.mkv", "road", 64, 48)).unwrap();
    let err = session.open(&missing).unwrap_err();

    assert!(matches!(err, LogError::Resource(_)));
    assert!(!missing.join("fcamera.mkv").exists());
    assert!(!missing.join("fcamera.mkv.lock").exists());
}

#[test]
fn test_encode_on_never_opened_session_is_defined_error() {
    let mut session =
        LogSession::new(SessionConfig::new("fcamera.mkv", "road", 64, 48)).unwrap();
    let (y, u, v) = test_frame(64, 48, 0);

    let err = session.encode(&y, &u, &v, 64, 48, 0).unwrap_err();
    assert!(matches!(err, LogError::Resource(_)));
}

#[test]
fn test_back_to_back_segments_from_one_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut session =
        LogSession::new(SessionConfig::new("fcamera.mkv", "road", 64, 48)).unwrap();

    for segment in 0..3 {
        let seg_dir = dir.path().join(format!("seg{}", segment));
        std::fs::create_dir(&seg_dir).unwrap();

        session.open(&seg_dir).unwrap();
        for n in 0..10u64 {
            let (y, u, v) = test_frame(64, 48, n as u8);
            session.encode(&y, &u, &v, 64, 48, n).unwrap();
        }
        session.close().unwrap();

        let (_, packets, _, _) = probe(&seg_dir.join("fcamera.mkv"));
        assert_eq!(packets, 10, "segment {} lost or duplicated frames", segment);
        assert!(!seg_dir.join("fcamera.mkv.lock").exists());
    }
}
