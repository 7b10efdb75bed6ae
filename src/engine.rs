//! The compositing engine facade.
//!
//! `Engine` ties the pipeline together: template load, region
//! resolution, artwork fitting, warp or paste, encode. Every failure is
//! request-scoped and deterministic; nothing here retries.

use crate::envelope::Envelope;
use crate::fit::{self, FitMode, FitOptions};
use crate::frame;
use crate::geom::Quad;
use crate::raster::io::{decode_raster, encode_raster, OutputFormat};
use crate::raster::Raster;
use crate::region::{self, colorkey, ColorKeyConfig, KeyedRegion, ResolvedRegion};
use crate::template::{PlacementSpec, Template, TemplateRegistry};
use crate::trace::{trace_event, trace_span};
use crate::util::{MockwarpError, MockwarpResult};
use crate::warp::{self, WarpOptions};

/// Per-request compositing options.
///
/// `feather_px` and `opacity` default to the template manifest values
/// when unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyOptions {
    pub fit: FitMode,
    /// Symmetric padding fraction inside the target region.
    pub padding: f32,
    /// Absolute inset in pixels inside the target region.
    pub margin_px: usize,
    pub feather_px: Option<f32>,
    pub opacity: Option<f32>,
    pub format: OutputFormat,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            fit: FitMode::Contain,
            padding: 0.0,
            margin_px: 0,
            feather_px: None,
            opacity: None,
            format: OutputFormat::Png,
        }
    }
}

impl ApplyOptions {
    fn fit_options(&self) -> FitOptions {
        FitOptions {
            mode: self.fit,
            padding: self.padding,
            margin_px: self.margin_px,
        }
    }
}

/// One finished composite plus its identifying metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOutput {
    pub bytes: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub room: String,
    pub template_id: String,
    pub format: OutputFormat,
}

impl CompositeOutput {
    /// The base64 JSON envelope for HTTP-embedded consumption.
    pub fn envelope(&self) -> Envelope {
        Envelope::new(&self.bytes, self.width, self.height)
    }
}

/// Stateless compositing engine over a template registry.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: TemplateRegistry,
    colorkey: ColorKeyConfig,
}

impl Engine {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            colorkey: ColorKeyConfig::default(),
        }
    }

    /// Replaces the color-key scan configuration.
    pub fn with_colorkey(mut self, colorkey: ColorKeyConfig) -> Self {
        self.colorkey = colorkey;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Composites encoded artwork bytes into a registry template.
    pub fn apply_bytes(
        &self,
        artwork: &[u8],
        room: &str,
        template_id: &str,
        opts: &ApplyOptions,
    ) -> MockwarpResult<CompositeOutput> {
        let artwork = decode_raster(artwork)?;
        self.apply(&artwork, room, template_id, opts)
    }

    /// Composites a decoded artwork raster into a registry template.
    pub fn apply(
        &self,
        artwork: &Raster,
        room: &str,
        template_id: &str,
        opts: &ApplyOptions,
    ) -> MockwarpResult<CompositeOutput> {
        let _span = trace_span!("apply", room = room, template_id = template_id).entered();
        let template = self.registry.load(room, template_id)?;
        let composed = self.compose(artwork, &template, opts)?;
        let bytes = encode_raster(&composed, opts.format)?;
        trace_event!("composited", width = composed.width(), height = composed.height());
        Ok(CompositeOutput {
            bytes,
            width: composed.width(),
            height: composed.height(),
            room: template.room,
            template_id: template.id,
            format: opts.format,
        })
    }

    /// Runs the composite for an already-loaded template.
    pub fn compose(
        &self,
        artwork: &Raster,
        template: &Template,
        opts: &ApplyOptions,
    ) -> MockwarpResult<Raster> {
        let feather_px = opts.feather_px.unwrap_or(template.feather_px);
        let opacity = opts.opacity.unwrap_or(template.blend.opacity);
        let warp_opts = WarpOptions {
            feather_px,
            opacity,
            mode: template.blend.mode,
        };

        match &template.spec {
            PlacementSpec::FramedRect(style) => frame::composite_framed(artwork, style),
            spec => {
                let background =
                    template
                        .background
                        .as_ref()
                        .ok_or_else(|| MockwarpError::TemplateLoadFailed {
                            reason: "template has no background asset".to_string(),
                        })?;
                match region::resolve(background, spec, &self.colorkey)? {
                    ResolvedRegion::Quad(quad) => place_into_quad(
                        artwork,
                        background,
                        &quad,
                        &opts.fit_options(),
                        &warp_opts,
                    ),
                    ResolvedRegion::Keyed(region) => self.place_into_keyed(
                        artwork,
                        background,
                        &region,
                        &opts.fit_options(),
                        opacity,
                    ),
                }
            }
        }
    }

    fn place_into_keyed(
        &self,
        artwork: &Raster,
        background: &Raster,
        region: &KeyedRegion,
        fit_opts: &FitOptions,
        opacity: f32,
    ) -> MockwarpResult<Raster> {
        let bounds = region.bounds();
        let mut out = background.clone();

        // Hide the marker before the artwork goes in, so uncovered
        // margins show backdrop rather than marker color.
        let fill = colorkey::average_backdrop(background, region, &self.colorkey);
        colorkey::fill_region(&mut out, region, fill);

        let placement = fit::place(
            artwork.width(),
            artwork.height(),
            bounds.width,
            bounds.height,
            fit_opts,
        )?;
        let resized = warp::resize_bilinear(artwork, placement.width, placement.height)?;
        warp::blend_paste(
            &mut out,
            &resized,
            bounds.x as isize + placement.x,
            bounds.y as isize + placement.y,
            opacity,
        );
        Ok(out)
    }
}

/// Ad-hoc perspective composite for callers outside the registry: fits
/// the artwork to the quad's edge lengths and warps it onto the
/// background.
pub fn place_into_quad(
    artwork: &Raster,
    background: &Raster,
    quad: &Quad,
    fit_opts: &FitOptions,
    warp_opts: &WarpOptions,
) -> MockwarpResult<Raster> {
    quad.validate()?;

    let canvas_w = quad.top_width().round() as usize;
    let canvas_h = quad.left_height().round() as usize;
    if canvas_w < 2 || canvas_h < 2 {
        return Err(MockwarpError::InvalidGeometry {
            reason: "destination frame too small from corners",
        });
    }

    let placement = fit::place(
        artwork.width(),
        artwork.height(),
        canvas_w,
        canvas_h,
        fit_opts,
    )?;
    let resized = warp::resize_bilinear(artwork, placement.width, placement.height)?;
    let mut canvas = Raster::transparent(canvas_w, canvas_h)?;
    warp::blend_paste(&mut canvas, &resized, placement.x, placement.y, 1.0);

    warp::composite_quad(background, &canvas, quad, warp_opts)
}
