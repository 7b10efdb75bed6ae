//! Property checks for the artwork fitter.
//!
//! Contain must stay inside the target, cover must fill it, and the
//! fitted aspect ratio must match the source to within rounding of the
//! fitted dimensions.

use mockwarp::{fit_size, place, FitMode, FitOptions};
use rand::Rng;

/// Rounding-aware aspect tolerance: one fitted dimension is rounded to
/// the nearest integer, which drifts the ratio by at most
/// `ratio * 0.5 / fitted_height` (width-driven branch) or
/// `0.5 / fitted_height` (height-driven branch). Doubled for margin.
fn aspect_tolerance(ratio: f64, fh: usize) -> f64 {
    ratio.max(1.0) / fh as f64
}

#[test]
fn contain_never_exceeds_target() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let aw = rng.random_range(1..3000);
        let ah = rng.random_range(1..3000);
        let tw = rng.random_range(2..2000);
        let th = rng.random_range(2..2000);

        let (fw, fh) = fit_size(aw, ah, tw, th, FitMode::Contain).unwrap();
        assert!(fw <= tw, "{fw} > {tw} for art {aw}x{ah} target {tw}x{th}");
        assert!(fh <= th, "{fh} > {th} for art {aw}x{ah} target {tw}x{th}");
    }
}

#[test]
fn cover_always_fills_target() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let aw = rng.random_range(1..3000);
        let ah = rng.random_range(1..3000);
        let tw = rng.random_range(2..2000);
        let th = rng.random_range(2..2000);

        let (fw, fh) = fit_size(aw, ah, tw, th, FitMode::Cover).unwrap();
        assert!(fw >= tw, "{fw} < {tw} for art {aw}x{ah} target {tw}x{th}");
        assert!(fh >= th, "{fh} < {th} for art {aw}x{ah} target {tw}x{th}");
    }
}

#[test]
fn aspect_ratio_is_preserved_within_rounding() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let aw = rng.random_range(50..2500);
        let ah = rng.random_range(50..2500);
        let tw = rng.random_range(100..1800);
        let th = rng.random_range(100..1800);

        let ratio = aw as f64 / ah as f64;
        for mode in [FitMode::Contain, FitMode::Cover] {
            let (fw, fh) = fit_size(aw, ah, tw, th, mode).unwrap();
            let fitted_ratio = fw as f64 / fh as f64;
            let tol = aspect_tolerance(ratio, fh);
            assert!(
                (fitted_ratio - ratio).abs() <= tol,
                "ratio {fitted_ratio} vs {ratio} (tol {tol}) for art {aw}x{ah} target {tw}x{th} {mode:?}"
            );
        }
    }
}

#[test]
fn large_targets_hit_tight_aspect_tolerance() {
    // With fitted dimensions in the thousands the rounding drift falls
    // under 1e-3.
    let (fw, fh) = fit_size(1500, 1000, 3000, 3000, FitMode::Contain).unwrap();
    assert_eq!((fw, fh), (3000, 2000));
    let (fw, fh) = fit_size(1234, 2057, 4000, 4000, FitMode::Contain).unwrap();
    let ratio = 1234.0f64 / 2057.0;
    assert!((fw as f64 / fh as f64 - ratio).abs() < 1e-3);
}

#[test]
fn placement_is_centered_in_unpadded_target() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let aw = rng.random_range(50..2500);
        let ah = rng.random_range(50..2500);
        let tw = rng.random_range(100..1800);
        let th = rng.random_range(100..1800);

        let placement = place(aw, ah, tw, th, &FitOptions::default()).unwrap();
        // Centered within one pixel of symmetric margins.
        let right = tw as isize - placement.x - placement.width as isize;
        let bottom = th as isize - placement.y - placement.height as isize;
        assert!((placement.x - right).abs() <= 1);
        assert!((placement.y - bottom).abs() <= 1);
    }
}

#[test]
fn padded_placement_leaves_a_border_gap() {
    let placement = place(
        800,
        800,
        400,
        400,
        &FitOptions {
            mode: FitMode::Contain,
            padding: 0.05,
            margin_px: 0,
        },
    )
    .unwrap();
    assert_eq!((placement.width, placement.height), (360, 360));
    assert!(placement.x >= 20 && placement.y >= 20);
}
