use criterion::{criterion_group, criterion_main, Criterion};
use mockwarp::region::colorkey::detect_largest;
use mockwarp::{
    place_into_quad, ColorKeyConfig, FitOptions, Point, Quad, Raster, WarpOptions,
};
use std::hint::black_box;

fn make_scene(width: usize, height: usize) -> Raster {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
            data.extend_from_slice(&[value, value / 2, 255 - value, 255]);
        }
    }
    Raster::new(data, width, height).unwrap()
}

fn bench_perspective_composite(c: &mut Criterion) {
    let background = make_scene(512, 512);
    let artwork = make_scene(256, 256);
    let quad = Quad::new(
        Point::new(96.0, 80.0),
        Point::new(420.0, 104.0),
        Point::new(404.0, 436.0),
        Point::new(88.0, 410.0),
    );
    let warp_opts = WarpOptions {
        feather_px: 3.0,
        opacity: 0.95,
        ..WarpOptions::default()
    };

    c.bench_function("perspective_composite_512", |b| {
        b.iter(|| {
            let out = place_into_quad(
                black_box(&artwork),
                black_box(&background),
                &quad,
                &FitOptions::default(),
                &warp_opts,
            )
            .unwrap();
            black_box(out);
        })
    });
}

fn bench_colorkey_scan(c: &mut Criterion) {
    let mut background = Raster::filled(512, 512, [228, 226, 220, 255]).unwrap();
    background.fill_rect(140, 120, 240, 180, [255, 0, 255, 255]);
    let cfg = ColorKeyConfig::default();

    c.bench_function("colorkey_scan_512", |b| {
        b.iter(|| {
            let region = detect_largest(black_box(&background), &cfg).unwrap();
            black_box(region);
        })
    });

    let coarse = ColorKeyConfig {
        sample_step: 4,
        ..ColorKeyConfig::default()
    };
    c.bench_function("colorkey_scan_512_step4", |b| {
        b.iter(|| {
            let region = detect_largest(black_box(&background), &coarse).unwrap();
            black_box(region);
        })
    });
}

criterion_group!(benches, bench_perspective_composite, bench_colorkey_scan);
criterion_main!(benches);
