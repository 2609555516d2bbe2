//! The rebuild cycle.
//!
//! [`Rebuilder`] owns the model and the workspace schema.  Every payload
//! goes through one [`rebuild`](Rebuilder::rebuild) call:
//!
//! 1. **Release**: every output's workspace list is emptied; the outputs
//!    themselves stay, in the same order.
//! 2. **Parse**: the payload is run through the workspace schema, attaching
//!    each finished workspace to its output.
//! 3. **Install**: on success the new model is returned.  On failure the
//!    model is emptied again, so no partial update is ever visible, and the
//!    error is returned.
//!
//! `rebuild` takes `&mut self` and the model is only reachable through
//! `&self`, so nothing can observe the model mid-rebuild.

use crate::materializer::ArraySchema;
use crate::model::{OutputDirectory, Workspace};
use crate::schema::ParseError;
use crate::traits::TextShaper;
use crate::workspaces::{workspace_schema, ModelBuilder};
use log::{debug, warn};

/// Running totals over the lifetime of a [`Rebuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Payloads that produced a model.
    pub succeeded: u64,
    /// Payloads that were rejected.
    pub failed: u64,
}

/// Owns the workspace model and rebuilds it from payloads.
pub struct Rebuilder {
    schema: ArraySchema<Workspace, ModelBuilder>,
    builder: ModelBuilder,
    stats: RebuildStats,
}

impl Rebuilder {
    /// Create a rebuilder with an empty model.
    ///
    /// The workspace schema is built here, once, and reused for every
    /// payload.
    pub fn new(shaper: impl TextShaper + 'static) -> Self {
        Self::with_schema(workspace_schema(), shaper)
    }

    /// Create a rebuilder that parses payloads with `schema`.
    pub fn with_schema(
        schema: ArraySchema<Workspace, ModelBuilder>,
        shaper: impl TextShaper + 'static,
    ) -> Self {
        Self {
            schema,
            builder: ModelBuilder::new(Box::new(shaper)),
            stats: RebuildStats::default(),
        }
    }

    /// The current model.
    pub fn model(&self) -> &OutputDirectory {
        self.builder.directory()
    }

    pub fn stats(&self) -> RebuildStats {
        self.stats
    }

    /// Replace the model with the one described by `payload`.
    ///
    /// On error the model is left empty (outputs retained, no workspaces)
    /// until the next successful call.  Retrying is up to the caller.
    pub fn rebuild(&mut self, payload: &str) -> Result<&OutputDirectory, ParseError> {
        let released = self.builder.directory_mut().release();
        debug!("released {} workspace(s)", released);

        match self.schema.parse(payload, &mut self.builder) {
            Ok(count) => {
                self.stats.succeeded += 1;
                debug!(
                    "parsed {} workspace(s) across {} output(s)",
                    count,
                    self.model().len()
                );
                Ok(self.builder.directory())
            }
            Err(e) => {
                self.stats.failed += 1;
                let discarded = self.builder.directory_mut().release();
                warn!("update rejected, discarded {} workspace(s): {}", discarded, e);
                Err(e)
            }
        }
    }
}

//  Tests
