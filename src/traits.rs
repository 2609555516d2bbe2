//! Seams between the workspace model and its collaborators.
//!
//! The core only depends on these abstractions:
//!
//! * [`TextShaper`]: turns a workspace name into drawable glyphs and a
//!   width.
//! * [`PayloadSource`]: delivers raw status payloads from some transport.
//! * [`Renderer`]: consumes the finished model.

use crate::model::OutputDirectory;
use crate::shaping::ShapedText;
use std::sync::mpsc;

/// Encodes and measures workspace names.
pub trait TextShaper {
    /// Return the encoded glyphs of `text` together with its pixel width.
    fn shape_and_measure(&self, text: &str) -> ShapedText;
}

/// A source of raw workspace payloads.
///
/// Implementations listen on some transport (a Unix socket, stdin, …) and
/// forward each complete payload into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](PayloadSource::run) **blocks** until the source is exhausted,
///   the sink is closed, or an unrecoverable error occurs.
/// * Each received payload is sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait PayloadSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every payload into `sink`.
    fn run(&mut self, sink: mpsc::Sender<String>) -> Result<(), Self::Error>;
}

/// Draws the current model.
///
/// Only ever called between rebuilds, with the model borrowed read-only.
pub trait Renderer {
    type Error: std::error::Error + Send + 'static;

    fn render(&mut self, model: &OutputDirectory) -> Result<(), Self::Error>;
}
