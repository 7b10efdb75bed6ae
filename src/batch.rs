//! Batch generation across multiple templates.
//!
//! One artwork, many `(room, template_id)` selectors. Each template
//! composites independently against its own loaded assets, so entries
//! can run in parallel; a failing template is recorded against its own
//! entry and never aborts siblings.

use crate::engine::{ApplyOptions, CompositeOutput, Engine};
use crate::raster::Raster;
use crate::trace::{trace_event, trace_span};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// One `(room, template_id)` pair to composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSelector {
    pub room: String,
    pub template_id: String,
}

impl TemplateSelector {
    pub fn new<R: Into<String>, T: Into<String>>(room: R, template_id: T) -> Self {
        Self {
            room: room.into(),
            template_id: template_id.into(),
        }
    }
}

/// Outcome of one batch entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Completed(CompositeOutput),
    Failed { reason: String },
}

/// One batch result, tagged with its selector.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub room: String,
    pub template_id: String,
    pub outcome: BatchOutcome,
}

impl BatchEntry {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Completed(_))
    }
}

/// Batch execution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchConfig {
    /// Fan entries out over the rayon pool (requires the `rayon`
    /// feature; ignored otherwise). The pool bounds concurrency, which
    /// caps peak memory since every warp allocates a background-sized
    /// buffer.
    pub parallel: bool,
}

/// Composites one artwork into every selected template.
///
/// The returned entries are in selector order regardless of execution
/// order.
pub fn generate_batch(
    engine: &Engine,
    artwork: &Raster,
    selectors: &[TemplateSelector],
    opts: &ApplyOptions,
    cfg: &BatchConfig,
) -> Vec<BatchEntry> {
    let _span = trace_span!("batch", templates = selectors.len()).entered();

    let run_one = |selector: &TemplateSelector| -> BatchEntry {
        let outcome = match engine.apply(artwork, &selector.room, &selector.template_id, opts) {
            Ok(output) => BatchOutcome::Completed(output),
            Err(err) => BatchOutcome::Failed {
                reason: err.to_string(),
            },
        };
        BatchEntry {
            room: selector.room.clone(),
            template_id: selector.template_id.clone(),
            outcome,
        }
    };

    #[cfg(feature = "rayon")]
    let entries: Vec<BatchEntry> = if cfg.parallel {
        selectors.par_iter().map(run_one).collect()
    } else {
        selectors.iter().map(run_one).collect()
    };

    #[cfg(not(feature = "rayon"))]
    let entries: Vec<BatchEntry> = {
        let _ = cfg;
        selectors.iter().map(run_one).collect()
    };

    let completed = entries.iter().filter(|e| e.is_completed()).count();
    trace_event!("batch_done", completed = completed, total = entries.len());
    entries
}
