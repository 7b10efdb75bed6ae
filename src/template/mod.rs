//! Template registry over a directory tree of mockup scenes.
//!
//! Layout mirrors the template store: `<root>/<room>/<template_id>/`
//! holds a `manifest.json` plus the background asset it names. Templates
//! load read-only at request time and are never mutated by composites,
//! so one loaded template can serve concurrent requests.

use crate::frame::FramedStyle;
use crate::geom::Quad;
use crate::raster::io::load_raster;
use crate::raster::Raster;
use crate::util::{MockwarpError, MockwarpResult};
use crate::warp::BlendMode;
use std::fs;
use std::path::{Path, PathBuf};

mod manifest;

use manifest::{ManifestDoc, PlacementKind};

/// Where a template's artwork goes, selected by manifest metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementSpec {
    /// Four declared corners, possibly a tilted frame.
    ExplicitQuad(Quad),
    /// Region discovered by scanning for the marker color at composite
    /// time.
    ColorKey,
    /// Synthetic framed scene; no background asset, no warp.
    FramedRect(FramedStyle),
}

/// How the composited layer blends over the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendSpec {
    pub mode: BlendMode,
    pub opacity: f32,
}

impl Default for BlendSpec {
    fn default() -> Self {
        Self {
            mode: BlendMode::Normal,
            opacity: 1.0,
        }
    }
}

/// One loaded, immutable mockup scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub room: String,
    pub id: String,
    /// Absent only for framed templates, which build their own canvas.
    pub background: Option<Raster>,
    pub spec: PlacementSpec,
    pub feather_px: f32,
    pub blend: BlendSpec,
}

/// Listing entry for one template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateListing {
    pub id: String,
    pub manifest_present: bool,
}

/// Listing entry for one room directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomListing {
    pub room: String,
    pub templates: Vec<TemplateListing>,
}

/// Resolves `(room, template_id)` pairs against a template root.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    root: PathBuf,
}

impl TemplateRegistry {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads one template; all failures map to `TemplateLoadFailed`.
    pub fn load(&self, room: &str, template_id: &str) -> MockwarpResult<Template> {
        let room_dir = self.root.join(room);
        if !room_dir.is_dir() {
            return Err(MockwarpError::TemplateLoadFailed {
                reason: format!("room folder not found: {}", room_dir.display()),
            });
        }
        let tdir = room_dir.join(template_id);
        if !tdir.is_dir() {
            return Err(MockwarpError::TemplateLoadFailed {
                reason: format!(
                    "template '{template_id}' not found under {}",
                    room_dir.display()
                ),
            });
        }

        let manifest_path = tdir.join("manifest.json");
        let text = fs::read_to_string(&manifest_path).map_err(|err| {
            MockwarpError::TemplateLoadFailed {
                reason: format!("manifest.json missing in {}: {err}", tdir.display()),
            }
        })?;
        let doc = ManifestDoc::parse(&text)?;

        let kind = doc.placement_kind();
        let background = match kind {
            PlacementKind::Framed => None,
            PlacementKind::Corners | PlacementKind::ColorKey => {
                Some(load_background(&tdir, &doc)?)
            }
        };
        let spec = match kind {
            PlacementKind::Corners => PlacementSpec::ExplicitQuad(doc.corner_quad()?),
            PlacementKind::ColorKey => PlacementSpec::ColorKey,
            PlacementKind::Framed => {
                PlacementSpec::FramedRect(doc.framed.map(|f| f.into_style()).unwrap_or_default())
            }
        };

        Ok(Template {
            room: room.to_string(),
            id: template_id.to_string(),
            background,
            spec,
            feather_px: doc.feather_px,
            blend: BlendSpec {
                mode: doc.blend.mode.into(),
                opacity: doc.blend.opacity,
            },
        })
    }

    /// Enumerates rooms and template directories for diagnostics.
    pub fn list(&self) -> MockwarpResult<Vec<RoomListing>> {
        let mut rooms = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|err| {
            MockwarpError::TemplateLoadFailed {
                reason: format!("template root unreadable: {err}"),
            }
        })?;

        let mut room_dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();
        room_dirs.sort();

        for room_dir in room_dirs {
            let room = dir_name(&room_dir);
            let mut templates = Vec::new();
            let mut tdirs: Vec<PathBuf> = fs::read_dir(&room_dir)
                .map_err(|err| MockwarpError::TemplateLoadFailed {
                    reason: format!("room folder unreadable: {err}"),
                })?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_dir())
                .collect();
            tdirs.sort();

            for tdir in tdirs {
                templates.push(TemplateListing {
                    id: dir_name(&tdir),
                    manifest_present: tdir.join("manifest.json").is_file(),
                });
            }
            rooms.push(RoomListing { room, templates });
        }
        Ok(rooms)
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn load_background(tdir: &Path, doc: &ManifestDoc) -> MockwarpResult<Raster> {
    let name = doc
        .background
        .as_deref()
        .ok_or_else(|| MockwarpError::TemplateLoadFailed {
            reason: "manifest.json missing 'background'".to_string(),
        })?;
    let path = tdir.join(name);
    if !path.is_file() {
        return Err(MockwarpError::TemplateLoadFailed {
            reason: format!("background not found: {}", path.display()),
        });
    }
    load_raster(&path).map_err(|err| MockwarpError::TemplateLoadFailed {
        reason: format!("failed to open background: {err}"),
    })
}
