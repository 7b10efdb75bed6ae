//! Mockwarp composites flat artwork into photographic mockup scenes.
//!
//! A template resolves to a background image plus a placement spec:
//! explicit corner points (warped into place with a homography), a
//! color-keyed marker region (discovered by scanning at composite time),
//! or a synthetic framed scene. Fitting is aspect-preserving with
//! contain/cover modes; the perspective path supports edge feathering
//! and opacity blending. Optional parallelism for batch generation via
//! the `rayon` feature; structured spans via the `tracing` feature.

pub mod batch;
pub mod engine;
pub mod envelope;
pub mod fit;
pub mod frame;
pub mod geom;
pub mod raster;
pub mod region;
pub mod template;
mod trace;
pub mod util;
pub mod warp;

pub use batch::{generate_batch, BatchConfig, BatchEntry, BatchOutcome, TemplateSelector};
pub use engine::{place_into_quad, ApplyOptions, CompositeOutput, Engine};
pub use envelope::Envelope;
pub use fit::{fit_size, place, FitMode, FitOptions, Placement};
pub use frame::{composite_framed, FramedStyle};
pub use geom::{Point, Quad, Rect};
pub use raster::io::OutputFormat;
pub use raster::Raster;
pub use region::{ColorKeyConfig, KeyedRegion, ResolvedRegion};
pub use template::{
    BlendSpec, PlacementSpec, RoomListing, Template, TemplateListing, TemplateRegistry,
};
pub use util::{MockwarpError, MockwarpResult};
pub use warp::{composite_quad, BlendMode, Homography, WarpOptions};
