//! **wsbar**: the workspace model behind a window-manager status bar.
//!
//! The window manager periodically sends a JSON array describing every
//! workspace.  wsbar turns each such payload into an [`OutputDirectory`]:
//! the physical outputs in first-seen order, each owning its workspaces in
//! payload order.
//!
//! # Architecture
//!
//! * [`schema`]: the field binder.  A [`schema::ObjectSchema`] maps JSON
//!   keys to typed field setters, callbacks, or nested schemas.  Schemas are
//!   built once and reused for every payload.
//! * [`materializer`]: drives an element schema over a top-level array,
//!   creating one fresh record per element and committing it afterwards.
//! * [`workspaces`]: the concrete workspace/geometry schema and its
//!   callbacks.
//! * [`rebuild`]: [`Rebuilder`] releases the previous model, parses the
//!   new payload, and exposes the result read-only.
//!
//! Transports ([`ipc`]) and rendering ([`render`]) sit behind the traits in
//! [`traits`] so the core does not depend on either.
//!
//! [`OutputDirectory`]: model::OutputDirectory
//! [`Rebuilder`]: rebuild::Rebuilder

pub mod config;
pub mod ipc;
pub mod materializer;
pub mod model;
pub mod rebuild;
pub mod render;
pub mod schema;
pub mod shaping;
pub mod traits;
pub mod workspaces;
