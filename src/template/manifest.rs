//! Manifest schema for template directories.
//!
//! Each template directory carries a `manifest.json` declaring its
//! background asset and placement geometry:
//!
//! ```json
//! {
//!   "background": "bg.png",
//!   "corners": [[1370, 1185], [2742, 1189], [2744, 2815], [1368, 2811]],
//!   "feather_px": 2.0,
//!   "blend": { "mode": "normal", "opacity": 1.0 }
//! }
//! ```
//!
//! Corners are TL, TR, BR, BL. Templates without corners declare
//! `"placement": "color_key"` (marker scan at composite time) or
//! `"placement": "framed"` (no background asset, synthetic scene).

use crate::frame::{parse_hex_color, FramedStyle};
use crate::geom::Quad;
use crate::util::{MockwarpError, MockwarpResult};
use crate::warp::BlendMode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ManifestDoc {
    pub background: Option<String>,
    pub corners: Option<Vec<[f32; 2]>>,
    pub placement: Option<PlacementKind>,
    /// Declared background dimensions; a mismatch with the decoded asset
    /// is tolerated.
    #[allow(dead_code)]
    pub width: Option<usize>,
    #[allow(dead_code)]
    pub height: Option<usize>,
    #[serde(default)]
    pub feather_px: f32,
    #[serde(default)]
    pub blend: BlendDoc,
    pub framed: Option<FramedDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PlacementKind {
    Corners,
    ColorKey,
    Framed,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlendDoc {
    #[serde(default)]
    pub mode: BlendModeDoc,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl Default for BlendDoc {
    fn default() -> Self {
        Self {
            mode: BlendModeDoc::Normal,
            opacity: 1.0,
        }
    }
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BlendModeDoc {
    #[default]
    Normal,
    Multiply,
}

impl From<BlendModeDoc> for BlendMode {
    fn from(value: BlendModeDoc) -> Self {
        match value {
            BlendModeDoc::Normal => BlendMode::Normal,
            BlendModeDoc::Multiply => BlendMode::Multiply,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FramedDoc {
    pub canvas_width: Option<usize>,
    pub canvas_height: Option<usize>,
    pub background_color: Option<String>,
    pub frame_color: Option<String>,
    pub mat_color: Option<String>,
    pub art_background_color: Option<String>,
    pub shadow_offset: Option<[isize; 2]>,
}

impl FramedDoc {
    pub(crate) fn into_style(self) -> FramedStyle {
        let defaults = FramedStyle::default();
        FramedStyle {
            canvas_width: self.canvas_width.unwrap_or(defaults.canvas_width),
            canvas_height: self.canvas_height.unwrap_or(defaults.canvas_height),
            background: self
                .background_color
                .map(|c| parse_hex_color(&c, defaults.background))
                .unwrap_or(defaults.background),
            frame: self
                .frame_color
                .map(|c| parse_hex_color(&c, defaults.frame))
                .unwrap_or(defaults.frame),
            mat: self
                .mat_color
                .map(|c| parse_hex_color(&c, defaults.mat))
                .unwrap_or(defaults.mat),
            art_backdrop: self
                .art_background_color
                .map(|c| parse_hex_color(&c, defaults.art_backdrop))
                .unwrap_or(defaults.art_backdrop),
            shadow_offset: self
                .shadow_offset
                .map(|[x, y]| (x, y))
                .unwrap_or(defaults.shadow_offset),
        }
    }
}

impl ManifestDoc {
    pub(crate) fn parse(text: &str) -> MockwarpResult<Self> {
        serde_json::from_str(text).map_err(|err| MockwarpError::TemplateLoadFailed {
            reason: format!("manifest.json not valid JSON: {err}"),
        })
    }

    /// The placement kind, inferred from `corners` when not declared.
    pub(crate) fn placement_kind(&self) -> PlacementKind {
        match self.placement {
            Some(kind) => kind,
            None if self.corners.is_some() => PlacementKind::Corners,
            None => PlacementKind::ColorKey,
        }
    }

    /// Validates and extracts the corner quad.
    pub(crate) fn corner_quad(&self) -> MockwarpResult<Quad> {
        let corners = self
            .corners
            .as_ref()
            .ok_or_else(|| MockwarpError::TemplateLoadFailed {
                reason: "manifest.json missing 'corners'".to_string(),
            })?;
        if corners.len() != 4 {
            return Err(MockwarpError::TemplateLoadFailed {
                reason: "manifest.json 'corners' must be 4 points [TL,TR,BR,BL]".to_string(),
            });
        }
        Ok(Quad::from_corners([
            corners[0], corners[1], corners[2], corners[3],
        ]))
    }
}
