// SPDX-License-Identifier: MPL-2.0

//! Filterless point-sampled plane scaling for I420 frames
//!
//! Resizing here trades quality for speed: each output pixel is sampled from
//! a single source pixel chosen by 16.16 fixed-point stepping, with no
//! interpolation. The result is deterministic - identical input bytes and
//! dimensions always produce identical output bytes.

/// Scale one 8-bit plane by point sampling.
///
/// Source rows are `src_stride` bytes apart; destination rows `dst_stride`
/// bytes apart. Sampling positions are centered within each step so that a
/// 2:1 downscale reads every second pixel rather than biasing toward the
/// top-left corner.
#[allow(clippy::too_many_arguments)]
pub fn scale_plane(
    src: &[u8],
    src_stride: usize,
    src_w: usize,
    src_h: usize,
    dst: &mut [u8],
    dst_stride: usize,
    dst_w: usize,
    dst_h: usize,
) {
    debug_assert!(src_w > 0 && src_h > 0 && dst_w > 0 && dst_h > 0);
    debug_assert!(src.len() >= (src_h - 1) * src_stride + src_w);
    debug_assert!(dst.len() >= (dst_h - 1) * dst_stride + dst_w);

    let dx = ((src_w as u64) << 16) / dst_w as u64;
    let dy = ((src_h as u64) << 16) / dst_h as u64;

    let mut sy = dy / 2;
    for row in 0..dst_h {
        let src_row_idx = ((sy >> 16) as usize).min(src_h - 1);
        let src_row = &src[src_row_idx * src_stride..src_row_idx * src_stride + src_w];
        let dst_row = &mut dst[row * dst_stride..row * dst_stride + dst_w];

        let mut sx = dx / 2;
        for px in dst_row.iter_mut() {
            *px = src_row[((sx >> 16) as usize).min(src_w - 1)];
            sx += dx;
        }
        sy += dy;
    }
}

/// Scale three packed I420 planes into one packed output buffer.
///
/// Input planes are packed (stride equals width); `dst` receives the output
/// Y plane followed by the quarter-size U and V planes. All dimensions must
/// be even and `dst` must hold `out_w * out_h * 3 / 2` bytes.
#[allow(clippy::too_many_arguments)]
pub fn scale_i420(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    in_w: usize,
    in_h: usize,
    dst: &mut [u8],
    out_w: usize,
    out_h: usize,
) {
    debug_assert_eq!(dst.len(), out_w * out_h * 3 / 2);

    let (in_cw, in_ch) = (in_w / 2, in_h / 2);
    let (out_cw, out_ch) = (out_w / 2, out_h / 2);

    let (dst_y, dst_chroma) = dst.split_at_mut(out_w * out_h);
    let (dst_u, dst_v) = dst_chroma.split_at_mut(out_cw * out_ch);

    scale_plane(y, in_w, in_w, in_h, dst_y, out_w, out_w, out_h);
    scale_plane(u, in_cw, in_cw, in_ch, dst_u, out_cw, out_cw, out_ch);
    scale_plane(v, in_cw, in_cw, in_ch, dst_v, out_cw, out_cw, out_ch);
}
