//! Destination-region resolution.
//!
//! A template's placement spec either declares its destination corners
//! outright or defers to a color-key scan of the background. Either way
//! the resolver output is enough geometry for the compositor: a validated
//! quad, or a keyed region with bounds plus per-pixel membership.

use crate::geom::Quad;
use crate::raster::Raster;
use crate::template::PlacementSpec;
use crate::util::{MockwarpError, MockwarpResult};

pub mod colorkey;

pub use colorkey::{ColorKeyConfig, KeyedRegion};

/// A resolved destination region for one composite operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRegion {
    /// Four validated corners for the perspective path.
    Quad(Quad),
    /// A detected marker region for the axis-aligned paste path.
    Keyed(KeyedRegion),
}

/// Resolves a placement spec against a background raster.
///
/// Explicit corners pass through after validation; color-key templates
/// are scanned with `cfg`. Framed templates build their own scene and
/// have no placement region to resolve.
pub fn resolve(
    background: &Raster,
    spec: &PlacementSpec,
    cfg: &ColorKeyConfig,
) -> MockwarpResult<ResolvedRegion> {
    match spec {
        PlacementSpec::ExplicitQuad(quad) => {
            quad.validate()?;
            Ok(ResolvedRegion::Quad(*quad))
        }
        PlacementSpec::ColorKey => {
            let region = colorkey::detect_largest(background, cfg)?;
            Ok(ResolvedRegion::Keyed(region))
        }
        PlacementSpec::FramedRect(_) => Err(MockwarpError::InvalidGeometry {
            reason: "framed templates have no placement region",
        }),
    }
}
