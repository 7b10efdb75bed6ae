//! Homography computation from four point correspondences.
//!
//! Uses the Direct Linear Transform: the eight unknowns of the 3x3
//! projective matrix (with `h9 = 1`) are solved from the 8x8 linear
//! system built from the four correspondences, via Gaussian elimination
//! with partial pivoting. A near-zero pivot means the destination corners
//! are collinear or coincident and is reported as `HomographyDegenerate`
//! rather than silently producing a garbage transform.

use crate::geom::Quad;
use crate::util::{MockwarpError, MockwarpResult};

const PIVOT_EPSILON: f64 = 1e-10;

/// A 3x3 projective transform in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    m: [f64; 9],
}

impl Homography {
    /// Computes the transform mapping `src` corners onto `dst` corners.
    ///
    /// Corner order must match between the two quads (TL, TR, BR, BL).
    pub fn from_quads(src: &Quad, dst: &Quad) -> MockwarpResult<Self> {
        let sp = src.points();
        let dp = dst.points();
        let src_pts: [(f64, f64); 4] = [
            (sp[0].x as f64, sp[0].y as f64),
            (sp[1].x as f64, sp[1].y as f64),
            (sp[2].x as f64, sp[2].y as f64),
            (sp[3].x as f64, sp[3].y as f64),
        ];
        let dst_pts: [(f64, f64); 4] = [
            (dp[0].x as f64, dp[0].y as f64),
            (dp[1].x as f64, dp[1].y as f64),
            (dp[2].x as f64, dp[2].y as f64),
            (dp[3].x as f64, dp[3].y as f64),
        ];
        Self::from_points(src_pts, dst_pts)
    }

    /// Computes the transform from four `(x, y)` correspondences.
    pub fn from_points(
        src: [(f64, f64); 4],
        dst: [(f64, f64); 4],
    ) -> MockwarpResult<Self> {
        // Two equations per correspondence (x,y) -> (x',y'):
        //   x*h1 + y*h2 + h3 - x'*x*h7 - x'*y*h8 = x'
        //   x*h4 + y*h5 + h6 - y'*x*h7 - y'*y*h8 = y'
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (x, y) = src[i];
            let (xp, yp) = dst[i];

            let row1 = i * 2;
            let row2 = i * 2 + 1;

            a[row1][0] = x;
            a[row1][1] = y;
            a[row1][2] = 1.0;
            a[row1][6] = -xp * x;
            a[row1][7] = -xp * y;
            b[row1] = xp;

            a[row2][3] = x;
            a[row2][4] = y;
            a[row2][5] = 1.0;
            a[row2][6] = -yp * x;
            a[row2][7] = -yp * y;
            b[row2] = yp;
        }

        let h = solve_linear_system(&mut a, &mut b)?;
        Ok(Self {
            m: [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0],
        })
    }

    /// Applies the transform to a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let w = m[6] * x + m[7] * y + m[8];
        if w.abs() < 1e-12 {
            // Point at projective infinity; push it far out of any raster.
            return (f64::MAX, f64::MAX);
        }
        (
            (m[0] * x + m[1] * y + m[2]) / w,
            (m[3] * x + m[4] * y + m[5]) / w,
        )
    }
}

/// Solves an 8x8 system with partial pivoting; a vanishing pivot means a
/// singular system.
fn solve_linear_system(
    a: &mut [[f64; 8]; 8],
    b: &mut [f64; 8],
) -> MockwarpResult<[f64; 8]> {
    let n = 8;

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a[col][col].abs();
        for row in (col + 1)..n {
            if a[row][col].abs() > max_val {
                max_val = a[row][col].abs();
                max_row = row;
            }
        }
        if max_row != col {
            a.swap(col, max_row);
            b.swap(col, max_row);
        }

        let pivot = a[col][col];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MockwarpError::HomographyDegenerate);
        }

        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            for j in col..n {
                a[row][j] -= factor * a[col][j];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; 8];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for col in (row + 1)..n {
            acc -= a[row][col] * x[col];
        }
        x[row] = acc / a[row][row];
    }
    Ok(x)
}
