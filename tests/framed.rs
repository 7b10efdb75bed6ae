//! Framed-rectangle compositor geometry and palette checks.

use mockwarp::{composite_framed, FramedStyle, Raster};

const ART: [u8; 4] = [200, 30, 30, 255];

fn style() -> FramedStyle {
    FramedStyle {
        canvas_width: 320,
        canvas_height: 240,
        ..FramedStyle::default()
    }
}

// For a 100x80 artwork on a 320x240 canvas: inner area 176x141, frame
// band 30px (clamped up from 6%), mat band 25px (clamped up from 5%),
// outer block 286x251 at offset (17, -15).

#[test]
fn canvas_keeps_requested_dimensions() {
    let artwork = Raster::filled(100, 80, ART).unwrap();
    let out = composite_framed(&artwork, &style()).unwrap();
    assert_eq!((out.width(), out.height()), (320, 240));
}

#[test]
fn backdrop_frame_mat_and_artwork_are_layered() {
    let artwork = Raster::filled(100, 80, ART).unwrap();
    let style = style();
    let out = composite_framed(&artwork, &style).unwrap();

    // Far corner: untouched backdrop.
    assert_eq!(out.get(5, 5), Some(style.background));
    // Left frame band.
    assert_eq!(out.get(20, 120), Some(style.frame));
    // Mat band between frame and artwork.
    assert_eq!(out.get(57, 120), Some(style.mat));
    // Artwork center.
    assert_eq!(out.get(160, 120), Some(ART));
}

#[test]
fn drop_shadow_darkens_beside_the_frame() {
    let artwork = Raster::filled(100, 80, ART).unwrap();
    let style = style();
    let out = composite_framed(&artwork, &style).unwrap();

    // Right of the framed block (outer edge at x = 303) the offset
    // shadow shows over the backdrop.
    let shaded = out.get(310, 120).unwrap();
    assert!(
        shaded[0] < style.background[0] && shaded[1] < style.background[1],
        "expected shadow at (310,120), got {shaded:?}"
    );
    assert_eq!(shaded[3], 255);
}

#[test]
fn small_canvas_is_rejected() {
    let artwork = Raster::filled(100, 80, ART).unwrap();
    let style = FramedStyle {
        canvas_width: 32,
        canvas_height: 32,
        ..FramedStyle::default()
    };
    assert!(composite_framed(&artwork, &style).is_err());
}
