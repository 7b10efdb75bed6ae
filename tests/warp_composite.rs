//! Perspective-composite behavior: round-trip fidelity, degenerate
//! geometry, feathering, and determinism.

use mockwarp::{
    place_into_quad, FitOptions, MockwarpError, Point, Quad, Raster, Rect, WarpOptions,
};

const BG: [u8; 4] = [40, 40, 40, 255];
const ART: [u8; 4] = [200, 40, 40, 255];

fn background() -> Raster {
    Raster::filled(120, 100, BG).unwrap()
}

fn artwork() -> Raster {
    Raster::filled(40, 30, ART).unwrap()
}

#[test]
fn interior_pixels_round_trip_at_full_opacity() {
    // Axis-aligned quad matching the artwork's aspect: the warp is a
    // pure translation, so interior pixels come through exactly.
    let quad = Quad::from_rect(Rect::new(30, 20, 40, 30));
    let out = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &WarpOptions::default(),
    )
    .unwrap();

    assert_eq!(out.width(), 120);
    assert_eq!(out.height(), 100);
    assert_eq!(out.get(50, 35), Some(ART));
    assert_eq!(out.get(31, 21), Some(ART));
    // Background survives outside the quad.
    assert_eq!(out.get(10, 10), Some(BG));
    assert_eq!(out.get(110, 90), Some(BG));
}

#[test]
fn tilted_quad_lands_artwork_inside() {
    let quad = Quad::new(
        Point::new(25.0, 18.0),
        Point::new(78.0, 24.0),
        Point::new(74.0, 68.0),
        Point::new(21.0, 62.0),
    );
    let out = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &WarpOptions::default(),
    )
    .unwrap();

    // Far corners of the scene are untouched.
    assert_eq!(out.get(2, 2), Some(BG));
    assert_eq!(out.get(115, 95), Some(BG));
    // Around the quad centroid the artwork dominates.
    let px = out.get(49, 43).unwrap();
    assert!(px[0] > 150, "expected artwork red at centroid, got {px:?}");
}

#[test]
fn collinear_corners_are_rejected() {
    let quad = Quad::from_corners([[0.0, 0.0], [20.0, 20.0], [40.0, 40.0], [60.0, 60.0]]);
    let err = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &WarpOptions::default(),
    )
    .err()
    .unwrap();
    assert_eq!(
        err,
        MockwarpError::InvalidGeometry {
            reason: "corners are collinear or enclose no area",
        }
    );
}

#[test]
fn feathering_softens_the_seam() {
    let quad = Quad::from_rect(Rect::new(30, 20, 40, 30));
    let opts = WarpOptions {
        feather_px: 5.0,
        ..WarpOptions::default()
    };
    let out = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &opts,
    )
    .unwrap();

    // Deep inside: unaffected by the feather.
    assert_eq!(out.get(50, 35), Some(ART));
    // On the quad edge: strictly between artwork and background.
    let edge = out.get(30, 35).unwrap();
    assert!(
        edge[0] > BG[0] && edge[0] < ART[0],
        "edge pixel {edge:?} not blended"
    );
}

#[test]
fn repeated_composites_are_identical() {
    let quad = Quad::new(
        Point::new(25.0, 18.0),
        Point::new(78.0, 24.0),
        Point::new(74.0, 68.0),
        Point::new(21.0, 62.0),
    );
    let opts = WarpOptions {
        feather_px: 3.0,
        opacity: 0.85,
        ..WarpOptions::default()
    };
    let first = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &opts,
    )
    .unwrap();
    let second = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &opts,
    )
    .unwrap();
    assert_eq!(first, second);
}

#[test]
fn inputs_are_never_mutated() {
    let bg = background();
    let art = artwork();
    let quad = Quad::from_rect(Rect::new(30, 20, 40, 30));
    let _ = place_into_quad(&art, &bg, &quad, &FitOptions::default(), &WarpOptions::default())
        .unwrap();
    assert_eq!(bg, background());
    assert_eq!(art, artwork());
}

#[test]
fn tiny_quad_is_rejected() {
    let quad = Quad::from_rect(Rect::new(10, 10, 1, 30));
    let err = place_into_quad(
        &artwork(),
        &background(),
        &quad,
        &FitOptions::default(),
        &WarpOptions::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, MockwarpError::InvalidGeometry { .. }));
}
