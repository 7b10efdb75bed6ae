//! Framed-rectangle compositing.
//!
//! The cheap path for "picture frame on a flat backdrop" mockups: a solid
//! frame band and mat band around the fitted artwork, a blurred drop
//! shadow beneath the assembly, everything centered on a solid canvas.
//! No quadrilateral, no homography, no feathering.

use crate::fit::{fit_size, FitMode};
use crate::raster::{Raster, Rgba};
use crate::util::{MockwarpError, MockwarpResult};
use crate::warp::blur::blur_u8;
use crate::warp::{blend_paste, resize_bilinear};

/// Styling for a framed mockup scene.
#[derive(Debug, Clone, PartialEq)]
pub struct FramedStyle {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub background: Rgba,
    pub frame: Rgba,
    pub mat: Rgba,
    /// Fill behind artwork that does not cover the whole inner area.
    pub art_backdrop: Rgba,
    pub shadow_offset: (isize, isize),
}

impl Default for FramedStyle {
    fn default() -> Self {
        Self {
            canvas_width: 1536,
            canvas_height: 1024,
            background: parse_hex_color("#f5f1e9", [245, 241, 233, 255]),
            frame: parse_hex_color("#c7b299", [199, 178, 153, 255]),
            mat: parse_hex_color("#ffffff", [255, 255, 255, 255]),
            art_backdrop: parse_hex_color("#ffffff", [255, 255, 255, 255]),
            shadow_offset: (32, 48),
        }
    }
}

/// Shadow opacity over the backdrop.
const SHADOW_ALPHA: f32 = 0.35;

/// Parses a `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` color string.
///
/// A missing `#` prefix is tolerated; anything unparseable yields the
/// fallback.
pub fn parse_hex_color(input: &str, fallback: Rgba) -> Rgba {
    let hex = input.trim().trim_start_matches('#');

    let expand = |c: u8| -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some(v * 16 + v)
    };
    let pair = |hi: u8, lo: u8| -> Option<u8> {
        let h = (hi as char).to_digit(16)? as u8;
        let l = (lo as char).to_digit(16)? as u8;
        Some(h * 16 + l)
    };

    let bytes = hex.as_bytes();
    let parsed = match bytes.len() {
        3 | 4 => {
            let r = expand(bytes[0]);
            let g = expand(bytes[1]);
            let b = expand(bytes[2]);
            let a = if bytes.len() == 4 {
                expand(bytes[3])
            } else {
                Some(255)
            };
            match (r, g, b, a) {
                (Some(r), Some(g), Some(b), Some(a)) => Some([r, g, b, a]),
                _ => None,
            }
        }
        6 | 8 => {
            let r = pair(bytes[0], bytes[1]);
            let g = pair(bytes[2], bytes[3]);
            let b = pair(bytes[4], bytes[5]);
            let a = if bytes.len() == 8 {
                pair(bytes[6], bytes[7])
            } else {
                Some(255)
            };
            match (r, g, b, a) {
                (Some(r), Some(g), Some(b), Some(a)) => Some([r, g, b, a]),
                _ => None,
            }
        }
        _ => None,
    };
    parsed.unwrap_or(fallback)
}

fn clamp_band(value: f32, min: usize, max: usize) -> usize {
    (value.round() as usize).clamp(min, max)
}

/// Composites artwork into a framed scene on a solid canvas.
pub fn composite_framed(artwork: &Raster, style: &FramedStyle) -> MockwarpResult<Raster> {
    let canvas_w = style.canvas_width;
    let canvas_h = style.canvas_height;
    if canvas_w < 64 || canvas_h < 64 {
        return Err(MockwarpError::InvalidDimensions {
            width: canvas_w,
            height: canvas_h,
        });
    }

    // Inner (artwork) area bounded by 55% / 65% of the canvas.
    let max_inner_w = (canvas_w as f32 * 0.55).floor() as usize;
    let max_inner_h = (canvas_h as f32 * 0.65).floor() as usize;
    let (inner_w, inner_h) = fit_size(
        artwork.width(),
        artwork.height(),
        max_inner_w,
        max_inner_h,
        FitMode::Contain,
    )?;

    let frame_px = clamp_band(inner_w as f32 * 0.06, 30, 80);
    let mat_px = clamp_band(inner_w as f32 * 0.05, 25, 70);
    let outer_w = inner_w + (frame_px + mat_px) * 2;
    let outer_h = inner_h + (frame_px + mat_px) * 2;

    let offset_x = ((canvas_w as f32 - outer_w as f32) / 2.0).round() as isize;
    let offset_y =
        ((canvas_h as f32 - outer_h as f32) / 2.0 - canvas_h as f32 * 0.04).round() as isize;

    let mut canvas = Raster::filled(canvas_w, canvas_h, style.background)?;

    // Drop shadow: a solid block at the shadow offset, blurred, then
    // blended beneath the framed assembly.
    let shadow_radius = clamp_band(outer_w as f32 * 0.04, 20, 45);
    draw_shadow(
        &mut canvas,
        offset_x + style.shadow_offset.0,
        offset_y + style.shadow_offset.1,
        outer_w,
        outer_h,
        shadow_radius,
    );

    // Frame band, mat band, then the fitted artwork over its backdrop.
    canvas.fill_rect(offset_x, offset_y, outer_w, outer_h, style.frame);
    canvas.fill_rect(
        offset_x + frame_px as isize,
        offset_y + frame_px as isize,
        outer_w - frame_px * 2,
        outer_h - frame_px * 2,
        style.mat,
    );
    canvas.fill_rect(
        offset_x + (frame_px + mat_px) as isize,
        offset_y + (frame_px + mat_px) as isize,
        inner_w,
        inner_h,
        style.art_backdrop,
    );

    let resized = resize_bilinear(artwork, inner_w, inner_h)?;
    blend_paste(
        &mut canvas,
        &resized,
        offset_x + (frame_px + mat_px) as isize,
        offset_y + (frame_px + mat_px) as isize,
        1.0,
    );

    Ok(canvas)
}

fn draw_shadow(
    canvas: &mut Raster,
    left: isize,
    top: isize,
    width: usize,
    height: usize,
    radius: usize,
) {
    let cw = canvas.width();
    let ch = canvas.height();
    let mut mask = vec![0u8; cw * ch];
    let x0 = left.max(0) as usize;
    let y0 = top.max(0) as usize;
    let x1 = (left + width as isize).clamp(0, cw as isize) as usize;
    let y1 = (top + height as isize).clamp(0, ch as isize) as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            mask[y * cw + x] = 255;
        }
    }
    let blurred = blur_u8(&mask, cw, ch, (radius * 2) | 1);

    for y in 0..ch {
        for x in 0..cw {
            let a = blurred[y * cw + x] as f32 / 255.0 * SHADOW_ALPHA;
            if a <= 0.0 {
                continue;
            }
            let bg = canvas.get(x, y).expect("canvas within bounds");
            canvas.put(
                x,
                y,
                [
                    (bg[0] as f32 * (1.0 - a)).round() as u8,
                    (bg[1] as f32 * (1.0 - a)).round() as u8,
                    (bg[2] as f32 * (1.0 - a)).round() as u8,
                    255,
                ],
            );
        }
    }
}
