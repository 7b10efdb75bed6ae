//! Perspective warping and raster compositing.
//!
//! The perspective path warps a fitted artwork canvas into a destination
//! quadrilateral with an inverse-mapped bilinear resample, optionally
//! feathers the quad edges, and alpha-blends the result over the
//! background. A separate axis-aligned paste path serves color-keyed
//! regions, which never need a homography.
//!
//! Interpolation runs on alpha-premultiplied samples so transparent
//! border neighbors cannot darken edge pixels.

use crate::geom::Quad;
use crate::raster::{Raster, Rgba, CHANNELS};
use crate::trace::{trace_event, trace_span};
use crate::util::{MockwarpError, MockwarpResult};

pub mod blur;
pub mod homography;
pub mod mask;

pub use homography::Homography;

/// Blend mode for compositing the warped layer over the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    /// Multiplies warped RGB with the background before blending, which
    /// keeps scene shadows visible through the artwork.
    Multiply,
}

/// Options for one perspective composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpOptions {
    /// Edge-softening radius in pixels; 0 disables feathering.
    pub feather_px: f32,
    /// Blend opacity in `[0, 1]`.
    pub opacity: f32,
    pub mode: BlendMode,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            feather_px: 0.0,
            opacity: 1.0,
            mode: BlendMode::Normal,
        }
    }
}

/// Warps `src` into a `out_width` x `out_height` buffer so that the
/// corners of `src` land on `dst_quad`.
///
/// Out-of-source samples are fully transparent (border-transparent
/// semantics): nothing outside the source rectangle leaks into the warp.
pub fn warp_into(
    src: &Raster,
    dst_quad: &Quad,
    out_width: usize,
    out_height: usize,
) -> MockwarpResult<Raster> {
    let src_w = src.width();
    let src_h = src.height();
    let src_quad = Quad::from_corners([
        [0.0, 0.0],
        [src_w as f32, 0.0],
        [src_w as f32, src_h as f32],
        [0.0, src_h as f32],
    ]);
    // Inverse map: destination pixel -> source coordinate.
    let inverse = Homography::from_quads(dst_quad, &src_quad)?;

    let _span = trace_span!("perspective_warp", out_width = out_width, out_height = out_height)
        .entered();

    let mut out = Raster::transparent(out_width, out_height)?;
    let epsilon = 1e-4f64;
    let max_x = src_w as f64;
    let max_y = src_h as f64;

    for y in 0..out_height {
        for x in 0..out_width {
            let (sx, sy) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5);
            if !sx.is_finite()
                || !sy.is_finite()
                || sx < -epsilon
                || sy < -epsilon
                || sx > max_x + epsilon
                || sy > max_y + epsilon
            {
                continue;
            }
            // Shift from pixel-center coordinates into sample space.
            let px = sample_bilinear(src, sx - 0.5, sy - 0.5);
            out.put(x, y, px);
        }
    }

    Ok(out)
}

/// Composites a warped layer over the background.
///
/// `mask`, when present, is a background-sized u8 alpha multiplier (the
/// feathered quad mask). Background alpha is treated as fully opaque.
pub fn composite_warped(
    background: &Raster,
    warped: &Raster,
    mask: Option<&[u8]>,
    opacity: f32,
    mode: BlendMode,
) -> MockwarpResult<Raster> {
    let width = background.width();
    let height = background.height();
    if warped.width() != width || warped.height() != height {
        return Err(MockwarpError::InvalidDimensions {
            width: warped.width(),
            height: warped.height(),
        });
    }
    if let Some(mask) = mask {
        if mask.len() < width * height {
            return Err(MockwarpError::BufferTooSmall {
                needed: width * height,
                got: mask.len(),
            });
        }
    }

    let opacity = opacity.clamp(0.0, 1.0);
    let mut out = background.clone();

    for y in 0..height {
        for x in 0..width {
            let wp = warped.get(x, y).expect("warped within bounds");
            if wp[3] == 0 {
                continue;
            }
            let mask_a = mask.map_or(1.0, |m| m[y * width + x] as f32 / 255.0);
            let a = (wp[3] as f32 / 255.0) * mask_a * opacity;
            if a <= 0.0 {
                continue;
            }
            let bg = out.get(x, y).expect("background within bounds");
            let mut px: Rgba = [0, 0, 0, 255];
            for c in 0..3 {
                let fg = match mode {
                    BlendMode::Normal => wp[c] as f32,
                    BlendMode::Multiply => wp[c] as f32 * bg[c] as f32 / 255.0,
                };
                px[c] = (fg * a + bg[c] as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
            }
            out.put(x, y, px);
        }
    }

    Ok(out)
}

/// Full perspective composite: validate, warp, feather, blend.
///
/// `art_canvas` is the fitted artwork already centered on a transparent
/// canvas whose dimensions match the destination quad's edge lengths.
pub fn composite_quad(
    background: &Raster,
    art_canvas: &Raster,
    quad: &Quad,
    opts: &WarpOptions,
) -> MockwarpResult<Raster> {
    quad.validate()?;
    let width = background.width();
    let height = background.height();

    let warped = warp_into(art_canvas, quad, width, height)?;
    let feather_mask = if opts.feather_px > 0.0 {
        Some(mask::feathered_quad_mask(width, height, quad, opts.feather_px))
    } else {
        None
    };

    trace_event!("composite_quad", feather = opts.feather_px, opacity = opts.opacity);
    composite_warped(
        background,
        &warped,
        feather_mask.as_deref(),
        opts.opacity,
        opts.mode,
    )
}

/// Resizes a raster with bilinear sampling.
pub fn resize_bilinear(src: &Raster, width: usize, height: usize) -> MockwarpResult<Raster> {
    if width == 0 || height == 0 {
        return Err(MockwarpError::InvalidDimensions { width, height });
    }
    let mut out = Raster::transparent(width, height)?;
    let scale_x = src.width() as f64 / width as f64;
    let scale_y = src.height() as f64 / height as f64;

    for y in 0..height {
        let sy = (y as f64 + 0.5) * scale_y - 0.5;
        for x in 0..width {
            let sx = (x as f64 + 0.5) * scale_x - 0.5;
            out.put(x, y, sample_bilinear(src, sx, sy));
        }
    }
    Ok(out)
}

/// Alpha-blends `src` onto `dst` at an integer offset, clipped.
pub fn blend_paste(dst: &mut Raster, src: &Raster, left: isize, top: isize, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    for sy in 0..src.height() {
        let dy = top + sy as isize;
        if dy < 0 || dy >= dst.height() as isize {
            continue;
        }
        for sx in 0..src.width() {
            let dx = left + sx as isize;
            if dx < 0 || dx >= dst.width() as isize {
                continue;
            }
            let sp = src.get(sx, sy).expect("paste source within bounds");
            if sp[3] == 0 {
                continue;
            }
            let a = (sp[3] as f32 / 255.0) * opacity;
            let dp = dst.get(dx as usize, dy as usize).expect("paste dest within bounds");
            let mut px: Rgba = [0, 0, 0, 255];
            for c in 0..3 {
                px[c] = (sp[c] as f32 * a + dp[c] as f32 * (1.0 - a))
                    .round()
                    .clamp(0.0, 255.0) as u8;
            }
            dst.put(dx as usize, dy as usize, px);
        }
    }
}

/// Bilinear RGBA sample at a fractional coordinate, clamped to bounds.
///
/// Interpolates premultiplied components and unpremultiplies afterwards.
fn sample_bilinear(src: &Raster, x: f64, y: f64) -> Rgba {
    let max_x = src.width() as f64 - 1.0;
    let max_y = src.height() as f64 - 1.0;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let corners = [
        (src.get(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (src.get(x1, y0), fx * (1.0 - fy)),
        (src.get(x0, y1), (1.0 - fx) * fy),
        (src.get(x1, y1), fx * fy),
    ];

    let mut acc = [0.0f32; CHANNELS];
    for (px, w) in corners {
        let px = px.expect("clamped sample within bounds");
        let alpha = px[3] as f32 / 255.0;
        acc[0] += px[0] as f32 * alpha * w;
        acc[1] += px[1] as f32 * alpha * w;
        acc[2] += px[2] as f32 * alpha * w;
        acc[3] += px[3] as f32 * w;
    }

    let alpha = acc[3];
    if alpha < 0.5 {
        return [0, 0, 0, 0];
    }
    let inv = 255.0 / alpha;
    [
        (acc[0] * inv).round().clamp(0.0, 255.0) as u8,
        (acc[1] * inv).round().clamp(0.0, 255.0) as u8,
        (acc[2] * inv).round().clamp(0.0, 255.0) as u8,
        alpha.round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::{
        blend_paste, composite_quad, resize_bilinear, warp_into, BlendMode, WarpOptions,
    };
    use crate::geom::{Quad, Rect};
    use crate::raster::Raster;

    #[test]
    fn axis_aligned_warp_translates_pixels() {
        let mut art = Raster::filled(20, 10, [10, 200, 30, 255]).unwrap();
        art.put(5, 5, [255, 0, 0, 255]);

        let quad = Quad::from_rect(Rect::new(40, 30, 20, 10));
        let warped = warp_into(&art, &quad, 100, 80).unwrap();

        assert_eq!(warped.get(45, 35), Some([255, 0, 0, 255]));
        assert_eq!(warped.get(41, 31), Some([10, 200, 30, 255]));
        // Outside the quad stays transparent.
        assert_eq!(warped.get(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn full_opacity_composite_is_not_attenuated() {
        let background = Raster::filled(60, 60, [40, 40, 40, 255]).unwrap();
        let art = Raster::filled(20, 20, [200, 100, 50, 255]).unwrap();
        let quad = Quad::from_rect(Rect::new(20, 20, 20, 20));

        let out = composite_quad(&background, &art, &quad, &WarpOptions::default()).unwrap();
        assert_eq!(out.get(30, 30), Some([200, 100, 50, 255]));
        assert_eq!(out.get(5, 5), Some([40, 40, 40, 255]));
    }

    #[test]
    fn half_opacity_blends_with_background() {
        let background = Raster::filled(40, 40, [0, 0, 0, 255]).unwrap();
        let art = Raster::filled(10, 10, [255, 255, 255, 255]).unwrap();
        let quad = Quad::from_rect(Rect::new(10, 10, 10, 10));

        let opts = WarpOptions {
            opacity: 0.5,
            ..WarpOptions::default()
        };
        let out = composite_quad(&background, &art, &quad, &opts).unwrap();
        let px = out.get(15, 15).unwrap();
        assert!((px[0] as i32 - 128).abs() <= 1, "got {}", px[0]);
    }

    #[test]
    fn multiply_mode_darkens() {
        let background = Raster::filled(40, 40, [100, 100, 100, 255]).unwrap();
        let art = Raster::filled(10, 10, [128, 128, 128, 255]).unwrap();
        let quad = Quad::from_rect(Rect::new(10, 10, 10, 10));

        let opts = WarpOptions {
            mode: BlendMode::Multiply,
            ..WarpOptions::default()
        };
        let out = composite_quad(&background, &art, &quad, &opts).unwrap();
        let px = out.get(15, 15).unwrap();
        // 128 * 100 / 255 ~= 50
        assert!((px[0] as i32 - 50).abs() <= 1, "got {}", px[0]);
    }

    #[test]
    fn degenerate_quad_is_rejected() {
        let background = Raster::filled(40, 40, [0, 0, 0, 255]).unwrap();
        let art = Raster::filled(10, 10, [255, 255, 255, 255]).unwrap();
        let quad = Quad::from_corners([[0.0, 0.0], [10.0, 10.0], [20.0, 20.0], [30.0, 30.0]]);
        assert!(composite_quad(&background, &art, &quad, &WarpOptions::default()).is_err());
    }

    #[test]
    fn resize_preserves_solid_color() {
        let src = Raster::filled(10, 10, [9, 90, 200, 255]).unwrap();
        let out = resize_bilinear(&src, 25, 5).unwrap();
        assert_eq!(out.width(), 25);
        assert_eq!(out.height(), 5);
        assert_eq!(out.get(12, 2), Some([9, 90, 200, 255]));
    }

    #[test]
    fn blend_paste_clips_and_blends() {
        let mut dst = Raster::filled(10, 10, [0, 0, 0, 255]).unwrap();
        let src = Raster::filled(4, 4, [255, 255, 255, 255]).unwrap();
        blend_paste(&mut dst, &src, 8, 8, 1.0);
        assert_eq!(dst.get(9, 9), Some([255, 255, 255, 255]));
        assert_eq!(dst.get(7, 7), Some([0, 0, 0, 255]));
    }
}
