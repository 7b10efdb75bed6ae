//! Separable Gaussian blur over single-channel u8 buffers.
//!
//! Used to feather region masks and soften the framed-path drop shadow.
//! The kernel size is forced odd; sigma defaults from the kernel size
//! with `0.3 * ((k - 1) * 0.5 - 1) + 0.8` when not given explicitly.

/// Rounds a feather radius to the nearest odd kernel size, minimum 1.
pub fn odd_kernel_len(px: f32) -> usize {
    let k = px.round().max(1.0) as usize;
    k | 1
}

/// Blurs a single-channel buffer in place semantics (returns a new buffer).
///
/// `kernel_len` of 1 returns an unchanged copy. Edges clamp to the border
/// sample.
pub fn blur_u8(src: &[u8], width: usize, height: usize, kernel_len: usize) -> Vec<u8> {
    debug_assert_eq!(src.len(), width * height);
    let radius = kernel_len / 2;
    if radius == 0 {
        return src.to_vec();
    }

    let kernel = gaussian_kernel(kernel_len);
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];

    // Horizontal pass.
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (i, w) in kernel.iter().enumerate() {
                let sx = (x as isize + i as isize - radius as isize)
                    .clamp(0, width as isize - 1) as usize;
                acc += row[sx] as f32 * w;
            }
            tmp[y * width + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    // Vertical pass.
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (i, w) in kernel.iter().enumerate() {
                let sy = (y as isize + i as isize - radius as isize)
                    .clamp(0, height as isize - 1) as usize;
                acc += tmp[sy * width + x] as f32 * w;
            }
            out[y * width + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

fn gaussian_kernel(kernel_len: usize) -> Vec<f32> {
    let radius = (kernel_len / 2) as i32;
    let sigma = (0.3 * ((kernel_len as f32 - 1.0) * 0.5 - 1.0) + 0.8).max(0.1);
    let denom = 2.0 * sigma * sigma;

    let mut weights = Vec::with_capacity(kernel_len);
    let mut sum = 0.0f32;
    for i in -radius..=radius {
        let w = (-(i * i) as f32 / denom).exp();
        weights.push(w);
        sum += w;
    }
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::{blur_u8, odd_kernel_len};

    #[test]
    fn kernel_len_is_odd_and_positive() {
        assert_eq!(odd_kernel_len(0.0), 1);
        assert_eq!(odd_kernel_len(0.4), 1);
        assert_eq!(odd_kernel_len(4.0), 5);
        assert_eq!(odd_kernel_len(5.0), 5);
        assert_eq!(odd_kernel_len(6.0), 7);
    }

    #[test]
    fn unit_kernel_is_identity() {
        let src = vec![0, 255, 0, 255, 0, 255];
        assert_eq!(blur_u8(&src, 3, 2, 1), src);
    }

    #[test]
    fn uniform_field_is_unchanged() {
        let src = vec![200u8; 49];
        let out = blur_u8(&src, 7, 7, 5);
        assert!(out.iter().all(|&v| (199..=201).contains(&v)));
    }

    #[test]
    fn step_edge_is_softened() {
        let mut src = vec![0u8; 16 * 4];
        for y in 0..4 {
            for x in 8..16 {
                src[y * 16 + x] = 255;
            }
        }
        let out = blur_u8(&src, 16, 4, 5);
        // The edge column picks up intermediate values from both sides.
        let row = 16;
        let edge = out[row + 8];
        assert!(edge > 0 && edge < 255, "edge value {edge}");
        assert_eq!(out[row], 0);
        assert_eq!(out[row + 15], 255);
    }
}
