//! Affine image drawing.
//!
//! [`draw_image`] places a source surface onto a destination through an
//! affine transform, the way a 2D canvas `drawImage` call does under the
//! current transform. Every destination pixel center inside the
//! transformed source is inverse-mapped, sampled bilinearly in
//! premultiplied alpha and composited with Porter-Duff "over".

use glam::{DAffine2, DVec2};
use mockup_core::Surface;
use tracing::trace;

use crate::parallel::for_each_row;
use crate::resize::{downscale, premultiply, unpremultiply, Filter};
use crate::{OpsError, OpsResult};

/// Shrink factor beyond which a source is prefiltered before sampling.
pub const PREFILTER_THRESHOLD: f64 = 2.0;

/// Composites a premultiplied foreground over a premultiplied background.
#[inline]
pub fn over(fg: [f32; 4], bg: [f32; 4]) -> [f32; 4] {
    let inv = 1.0 - fg[3];
    [
        fg[0] + bg[0] * inv,
        fg[1] + bg[1] * inv,
        fg[2] + bg[2] * inv,
        fg[3] + bg[3] * inv,
    ]
}

/// Maps a `w` x `h` rectangle's pixel space onto `(x, y, dw, dh)`.
pub fn rect_transform(src_w: u32, src_h: u32, x: f64, y: f64, dw: f64, dh: f64) -> DAffine2 {
    DAffine2::from_translation(DVec2::new(x, y))
        * DAffine2::from_scale(DVec2::new(dw / src_w as f64, dh / src_h as f64))
}

/// Draws `src` onto `dst`. `transform` maps source pixel coordinates
/// (origin at the top-left corner, `(w, h)` at the bottom-right) to
/// destination pixel coordinates.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] when the transform is not invertible.
pub fn draw_image(dst: &mut Surface, src: &Surface, transform: DAffine2, smoothing: Filter) -> OpsResult<()> {
    let det = transform.matrix2.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return Err(OpsError::InvalidParameter(format!(
            "draw transform is not invertible (det {det})"
        )));
    }

    // Prefilter strong minification so bilinear sampling does not alias.
    let sx = transform.matrix2.x_axis.length();
    let sy = transform.matrix2.y_axis.length();
    let prefiltered;
    let (src, transform) = if sx * PREFILTER_THRESHOLD < 1.0 || sy * PREFILTER_THRESHOLD < 1.0 {
        let nw = shrunk_len(src.width(), sx);
        let nh = shrunk_len(src.height(), sy);
        trace!(from = ?src.dimensions(), to = ?(nw, nh), ?smoothing, "prefiltering source");
        prefiltered = downscale(src, nw, nh, smoothing)?;
        let back = DAffine2::from_scale(DVec2::new(
            src.width() as f64 / nw as f64,
            src.height() as f64 / nh as f64,
        ));
        (&prefiltered, transform * back)
    } else {
        (src, transform)
    };

    let (sw, sh) = (src.width() as f64, src.height() as f64);
    let Some((x0, y0, x1, y1)) = clip_bounds(&transform, sw, sh, dst.width(), dst.height()) else {
        return Ok(());
    };
    let inverse = transform.inverse();
    let width = dst.width() as usize;

    for_each_row(dst.as_bytes_mut(), width * 4, |y, row| {
        if y < y0 || y >= y1 {
            return;
        }
        for x in x0..x1 {
            let p = inverse.transform_point2(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
            if p.x < 0.0 || p.y < 0.0 || p.x >= sw || p.y >= sh {
                continue;
            }
            let fg = sample_bilinear(src, p.x - 0.5, p.y - 0.5);
            if fg[3] <= 0.0 {
                continue;
            }
            let px = &mut row[x * 4..x * 4 + 4];
            let out = if fg[3] >= 1.0 { fg } else { over(fg, premultiply(px)) };
            px.copy_from_slice(&unpremultiply(out));
        }
    });
    Ok(())
}

fn shrunk_len(len: u32, scale: f64) -> u32 {
    ((len as f64 * scale).round() as u32).clamp(1, len)
}

/// Destination pixel range `[x0, x1) x [y0, y1)` covered by the
/// transformed source, clipped to the surface.
fn clip_bounds(t: &DAffine2, sw: f64, sh: f64, dw: u32, dh: u32) -> Option<(usize, usize, usize, usize)> {
    let corners = [(0.0, 0.0), (sw, 0.0), (sw, sh), (0.0, sh)]
        .map(|(x, y)| t.transform_point2(DVec2::new(x, y)));
    let min = corners.iter().fold(DVec2::splat(f64::INFINITY), |a, &c| a.min(c));
    let max = corners.iter().fold(DVec2::splat(f64::NEG_INFINITY), |a, &c| a.max(c));

    let x0 = min.x.floor().max(0.0) as usize;
    let y0 = min.y.floor().max(0.0) as usize;
    let x1 = (max.x.ceil().max(0.0) as usize).min(dw as usize);
    let y1 = (max.y.ceil().max(0.0) as usize).min(dh as usize);
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Bilinear sample at continuous pixel coordinates (pixel centers on
/// integers), clamped to the edge. Returns premultiplied `[0, 1]` floats.
fn sample_bilinear(src: &Surface, x: f64, y: f64) -> [f32; 4] {
    let max_x = src.width() as i64 - 1;
    let max_y = src.height() as i64 - 1;
    let fx0 = x.floor();
    let fy0 = y.floor();
    let tx = (x - fx0) as f32;
    let ty = (y - fy0) as f32;

    let x0 = (fx0 as i64).clamp(0, max_x) as u32;
    let y0 = (fy0 as i64).clamp(0, max_y) as u32;
    let x1 = (fx0 as i64 + 1).clamp(0, max_x) as u32;
    let y1 = (fy0 as i64 + 1).clamp(0, max_y) as u32;

    let p00 = premultiply(&src.pixel(x0, y0));
    let p10 = premultiply(&src.pixel(x1, y0));
    let p01 = premultiply(&src.pixel(x0, y1));
    let p11 = premultiply(&src.pixel(x1, y1));

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - tx) + p10[c] * tx;
        let bot = p01[c] * (1.0 - tx) + p11[c] * tx;
        out[c] = top * (1.0 - ty) + bot * ty;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn test_identity_copy() {
        let mut src = Surface::new(4, 4).unwrap();
        src.set_pixel(1, 2, RED);
        src.set_pixel(3, 0, [0, 0, 255, 255]);
        let mut dst = Surface::filled(4, 4, WHITE).unwrap();
        draw_image(&mut dst, &src, DAffine2::IDENTITY, Filter::Bilinear).unwrap();
        assert_eq!(dst.pixel(1, 2), RED);
        assert_eq!(dst.pixel(3, 0), [0, 0, 255, 255]);
        // Transparent source pixels leave the destination alone.
        assert_eq!(dst.pixel(0, 0), WHITE);
    }

    #[test]
    fn test_translate_and_scale_into_rect() {
        let src = Surface::filled(2, 2, RED).unwrap();
        let mut dst = Surface::filled(10, 10, WHITE).unwrap();
        draw_image(&mut dst, &src, rect_transform(2, 2, 2.0, 3.0, 4.0, 4.0), Filter::Bilinear).unwrap();
        assert_eq!(dst.pixel(2, 3), RED);
        assert_eq!(dst.pixel(5, 6), RED);
        assert_eq!(dst.pixel(1, 3), WHITE);
        assert_eq!(dst.pixel(6, 3), WHITE);
        assert_eq!(dst.pixel(2, 7), WHITE);
    }

    #[test]
    fn test_half_transparent_over_white() {
        let src = Surface::filled(1, 1, [0, 0, 0, 128]).unwrap();
        let mut dst = Surface::filled(1, 1, WHITE).unwrap();
        draw_image(&mut dst, &src, DAffine2::IDENTITY, Filter::Bilinear).unwrap();
        let px = dst.pixel(0, 0);
        assert_eq!(px[3], 255);
        assert!((px[0] as i32 - 127).abs() <= 1);
    }

    #[test]
    fn test_rotation_about_center_is_clockwise() {
        // A 2-pixel-tall red bar, rotated 90° about the surface center,
        // becomes a vertical bar.
        let src = Surface::filled(8, 2, RED).unwrap();
        let mut dst = Surface::filled(8, 8, WHITE).unwrap();
        let t = DAffine2::from_translation(DVec2::new(4.0, 4.0))
            * DAffine2::from_angle(std::f64::consts::FRAC_PI_2)
            * DAffine2::from_translation(DVec2::new(-4.0, -1.0));
        draw_image(&mut dst, &src, t, Filter::Bilinear).unwrap();
        assert_eq!(dst.pixel(4, 0), RED);
        assert_eq!(dst.pixel(3, 7), RED);
        assert_eq!(dst.pixel(0, 4), WHITE);
        assert_eq!(dst.pixel(7, 3), WHITE);
    }

    #[test]
    fn test_strong_downscale_is_prefiltered() {
        // Fine checkerboard averages to grey instead of aliasing.
        let mut src = Surface::new(64, 64).unwrap();
        for y in 0..64 {
            for x in 0..64 {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                src.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        let mut dst = Surface::filled(8, 8, WHITE).unwrap();
        draw_image(&mut dst, &src, rect_transform(64, 64, 0.0, 0.0, 8.0, 8.0), Filter::Lanczos3).unwrap();
        let px = dst.pixel(4, 4);
        assert!((px[0] as i32 - 128).abs() <= 8, "got {px:?}");
    }

    #[test]
    fn test_singular_transform_rejected() {
        let src = Surface::filled(2, 2, RED).unwrap();
        let mut dst = Surface::filled(2, 2, WHITE).unwrap();
        let t = DAffine2::from_scale(DVec2::new(0.0, 1.0));
        assert!(matches!(
            draw_image(&mut dst, &src, t, Filter::Bilinear),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_outside_destination_is_noop() {
        let src = Surface::filled(2, 2, RED).unwrap();
        let mut dst = Surface::filled(4, 4, WHITE).unwrap();
        let t = DAffine2::from_translation(DVec2::new(10.0, 10.0));
        draw_image(&mut dst, &src, t, Filter::Bilinear).unwrap();
        assert!(dst.as_bytes().iter().all(|&b| b == 255));
    }
}
