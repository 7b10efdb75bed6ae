//! Marker-color region detection.
//!
//! Templates without declared corners reserve their placement area with a
//! pink/magenta marker fill. The scan classifies pixels against a family
//! of marker shades (the tolerance has to absorb anti-aliased template
//! edges), grows 4-connected components by flood fill, drops components
//! below a noise threshold, and keeps the one with the largest bounding
//! box.
//!
//! Subsampling policy: `sample_step` thins the *seed* scan only; once a
//! seed hits, the flood fill always runs at full resolution, so component
//! bounds stay exact. `max_samples` caps how many seed probes the scan
//! spends before giving up early on very large backgrounds. Both are
//! deliberate, documented tunables rather than silent behavior.

use crate::geom::Rect;
use crate::raster::{Raster, Rgba};
use crate::trace::{trace_event, trace_span};
use crate::util::{MockwarpError, MockwarpResult};

/// Marker classifier thresholds and scan policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorKeyConfig {
    /// Red floor for the primary pink clause.
    pub min_red: u8,
    /// Green ceiling for the primary pink clause.
    pub max_green: u8,
    /// Blue floor for the primary pink clause.
    pub min_blue: u8,
    /// Red must exceed green by at least this much.
    pub red_over_green: u8,
    /// Red may trail blue by at most this much.
    pub red_under_blue: u8,
    /// Minimum connected-component pixel count; smaller blobs are noise.
    pub min_area_px: usize,
    /// Seed-scan stride in pixels (1 = every pixel).
    pub sample_step: usize,
    /// Seed-probe budget before the scan exits early (0 = unbounded).
    pub max_samples: usize,
}

impl Default for ColorKeyConfig {
    fn default() -> Self {
        Self {
            min_red: 180,
            max_green: 150,
            min_blue: 100,
            red_over_green: 50,
            red_under_blue: 50,
            min_area_px: 100,
            sample_step: 1,
            max_samples: 0,
        }
    }
}

impl ColorKeyConfig {
    /// Tests whether a pixel belongs to the marker color family.
    ///
    /// The primary clause covers hot/deep pink; the two fixed secondary
    /// clauses widen the family to bright fuchsia and light pink so
    /// anti-aliased edges still classify as marker.
    pub fn is_marker(&self, px: Rgba) -> bool {
        let (r, g, b) = (px[0] as i32, px[1] as i32, px[2] as i32);
        let pinkish = r > self.min_red as i32
            && g < self.max_green as i32
            && b > self.min_blue as i32
            && r > g + self.red_over_green as i32
            && r > b - self.red_under_blue as i32;
        let fuchsia = r > 200 && b > 200 && g < 100;
        let light_pink = r > 220 && g > 150 && b > 150 && r > g && r > b;
        pinkish || fuchsia || light_pink
    }
}

/// A detected marker region: bounding rectangle plus pixel membership.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRegion {
    bounds: Rect,
    /// Row-major membership over `bounds`.
    mask: Vec<bool>,
    pixel_count: usize,
}

impl KeyedRegion {
    /// Axis-aligned bounding rectangle in background coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of marker pixels in the component.
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Membership test in absolute background coordinates.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        if x < self.bounds.x || y < self.bounds.y {
            return false;
        }
        let lx = x - self.bounds.x;
        let ly = y - self.bounds.y;
        if lx >= self.bounds.width || ly >= self.bounds.height {
            return false;
        }
        self.mask[ly * self.bounds.width + lx]
    }
}

/// Scans a background for the largest marker component.
///
/// Returns `NoRegionDetected` when no component survives `min_area_px`.
pub fn detect_largest(
    background: &Raster,
    cfg: &ColorKeyConfig,
) -> MockwarpResult<KeyedRegion> {
    let width = background.width();
    let height = background.height();
    let step = cfg.sample_step.max(1);

    let _span = trace_span!("colorkey_scan", width = width, height = height, step = step)
        .entered();

    let mut visited = vec![false; width * height];
    let mut best: Option<Component> = None;
    let mut components = 0usize;
    let mut probes = 0usize;

    'scan: for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            if cfg.max_samples > 0 && probes >= cfg.max_samples {
                break 'scan;
            }
            probes += 1;

            if visited[y * width + x] {
                continue;
            }
            let px = background.get(x, y).expect("seed within bounds");
            if !cfg.is_marker(px) {
                continue;
            }

            let component = flood_fill(background, cfg, &mut visited, x, y);
            if component.pixels.len() <= cfg.min_area_px {
                continue;
            }
            components += 1;
            let replace = match &best {
                Some(current) => component.bounds().area() > current.bounds().area(),
                None => true,
            };
            if replace {
                best = Some(component);
            }
        }
    }

    trace_event!("colorkey_components", kept = components, probes = probes);

    let component = best.ok_or(MockwarpError::NoRegionDetected {
        reason: "no marker component above the area threshold",
    })?;
    Ok(component.into_region())
}

/// Samples the backdrop just outside the region's four edge midpoints and
/// averages the non-marker hits; falls back to light gray. Used to fill
/// the marker area before artwork is pasted over it.
pub fn average_backdrop(background: &Raster, region: &KeyedRegion, cfg: &ColorKeyConfig) -> Rgba {
    let bounds = region.bounds();
    let cx = (bounds.x + bounds.width / 2) as isize;
    let cy = (bounds.y + bounds.height / 2) as isize;
    let probes = [
        (bounds.x as isize - 10, cy),
        ((bounds.x + bounds.width) as isize + 10, cy),
        (cx, bounds.y as isize - 10),
        (cx, (bounds.y + bounds.height) as isize + 10),
    ];

    let mut sum = [0u32; 3];
    let mut hits = 0u32;
    for (px, py) in probes {
        if px < 0 || py < 0 {
            continue;
        }
        let Some(sample) = background.get(px as usize, py as usize) else {
            continue;
        };
        if cfg.is_marker(sample) {
            continue;
        }
        sum[0] += sample[0] as u32;
        sum[1] += sample[1] as u32;
        sum[2] += sample[2] as u32;
        hits += 1;
    }

    if hits == 0 {
        return [240, 240, 240, 255];
    }
    [
        (sum[0] / hits) as u8,
        (sum[1] / hits) as u8,
        (sum[2] / hits) as u8,
        255,
    ]
}

/// Overwrites every member pixel of the region with `color`.
pub fn fill_region(target: &mut Raster, region: &KeyedRegion, color: Rgba) {
    let bounds = region.bounds();
    for ly in 0..bounds.height {
        for lx in 0..bounds.width {
            if region.contains(bounds.x + lx, bounds.y + ly) {
                target.put(bounds.x + lx, bounds.y + ly, color);
            }
        }
    }
}

struct Component {
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
    pixels: Vec<(usize, usize)>,
}

impl Component {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x + 1,
            self.max_y - self.min_y + 1,
        )
    }

    fn into_region(self) -> KeyedRegion {
        let bounds = self.bounds();
        let mut mask = vec![false; bounds.width * bounds.height];
        for (x, y) in &self.pixels {
            mask[(y - bounds.y) * bounds.width + (x - bounds.x)] = true;
        }
        KeyedRegion {
            bounds,
            mask,
            pixel_count: self.pixels.len(),
        }
    }
}

/// Grows a 4-connected marker component from a seed with an explicit
/// stack; runs at full resolution regardless of the seed-scan stride.
fn flood_fill(
    background: &Raster,
    cfg: &ColorKeyConfig,
    visited: &mut [bool],
    seed_x: usize,
    seed_y: usize,
) -> Component {
    let width = background.width();
    let height = background.height();
    let mut component = Component {
        min_x: seed_x,
        max_x: seed_x,
        min_y: seed_y,
        max_y: seed_y,
        pixels: Vec::new(),
    };
    let mut stack = vec![(seed_x, seed_y)];

    while let Some((x, y)) = stack.pop() {
        let idx = y * width + x;
        if visited[idx] {
            continue;
        }
        let px = background.get(x, y).expect("flood fill stays in bounds");
        if !cfg.is_marker(px) {
            continue;
        }
        visited[idx] = true;
        component.pixels.push((x, y));
        component.min_x = component.min_x.min(x);
        component.max_x = component.max_x.max(x);
        component.min_y = component.min_y.min(y);
        component.max_y = component.max_y.max(y);

        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if x > 0 {
            stack.push((x - 1, y));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
    }

    component
}
