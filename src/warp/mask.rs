//! Polygon mask rasterization and feathering.

use crate::geom::Quad;
use crate::warp::blur::{blur_u8, odd_kernel_len};

/// Rasterizes the quad into a binary (0/255) mask of the given size.
///
/// Pixel centers (`x + 0.5, y + 0.5`) inside the polygon are set; even-odd
/// scanline filling keeps the behavior well-defined even for slightly
/// concave corner sets.
pub fn rasterize_quad(width: usize, height: usize, quad: &Quad) -> Vec<u8> {
    let mut mask = vec![0u8; width * height];
    let pts = quad.points();

    for y in 0..height {
        let yc = y as f32 + 0.5;
        let mut xs: Vec<f32> = Vec::with_capacity(4);
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            if (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc) {
                let t = (yc - a.y) / (b.y - a.y);
                xs.push(a.x + t * (b.x - a.x));
            }
        }
        xs.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));

        for pair in xs.chunks_exact(2) {
            let x_start = (pair[0] - 0.5).ceil().max(0.0) as usize;
            let x_end = ((pair[1] - 0.5).floor().min(width as f32 - 1.0)) as isize;
            if x_end < x_start as isize {
                continue;
            }
            let row = y * width;
            for x in x_start..=(x_end as usize) {
                mask[row + x] = 255;
            }
        }
    }

    mask
}

/// Builds the quad mask and feathers its edges with a Gaussian blur.
///
/// A non-positive feather returns the hard-edged mask.
pub fn feathered_quad_mask(
    width: usize,
    height: usize,
    quad: &Quad,
    feather_px: f32,
) -> Vec<u8> {
    let mask = rasterize_quad(width, height, quad);
    if feather_px <= 0.0 {
        return mask;
    }
    blur_u8(&mask, width, height, odd_kernel_len(feather_px))
}
