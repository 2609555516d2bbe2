//! The workspace payload schema.
//!
//! Each element of the payload array looks like
//!
//! ```json
//! {"num": 1, "name": "1", "visible": true, "focused": true, "urgent": false,
//!  "rect": {"x": 0, "y": 0, "width": 1920, "height": 29}, "output": "LVDS1"}
//! ```
//!
//! `name` and `output` are required.  Scalars are written through field
//! setters; `name` and `output` go through callbacks because they carry side
//! effects (shaping, and resolving the owning output).

use crate::materializer::ArraySchema;
use crate::model::{Geometry, OutputDirectory, Workspace};
use crate::schema::{Field, ObjectSchema, Rejection, Value, ValueKind};
use crate::traits::TextShaper;

/// Parse context for workspace payloads: the model under construction and
/// the shaper used for labels.
pub struct ModelBuilder {
    directory: OutputDirectory,
    shaper: Box<dyn TextShaper>,
}

impl ModelBuilder {
    pub fn new(shaper: Box<dyn TextShaper>) -> Self {
        Self {
            directory: OutputDirectory::new(),
            shaper,
        }
    }

    pub fn directory(&self) -> &OutputDirectory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut OutputDirectory {
        &mut self.directory
    }
}

fn workspace_rect(ws: &mut Workspace) -> &mut Geometry {
    &mut ws.rect
}

/// Stores the name and its shaped label.
fn on_name(ws: &mut Workspace, value: &Value, builder: &mut ModelBuilder) -> Result<(), Rejection> {
    let name = value.as_str().unwrap_or_default();
    ws.label = builder.shaper.shape_and_measure(name);
    ws.name = name.to_string();
    Ok(())
}

/// Resolves the owning output, creating it on first sight so the directory
/// keeps first-seen order.
///
/// If an element repeats `output`, the last name owns the workspace. Outputs
/// named earlier stay in the directory, possibly with no workspaces.
fn on_output(ws: &mut Workspace, value: &Value, builder: &mut ModelBuilder) -> Result<(), Rejection> {
    let name = value.as_str().unwrap_or_default();
    builder.directory.get_or_create(name);
    ws.output = name.to_string();
    Ok(())
}

fn commit(ws: Workspace, builder: &mut ModelBuilder) -> Result<(), Rejection> {
    builder.directory.attach(ws)?;
    Ok(())
}

/// Build the schema for the `rect` object.
pub fn geometry_schema() -> ObjectSchema<Geometry, ModelBuilder> {
    ObjectSchema::<Geometry, ModelBuilder>::new()
        .bind_field("x", Field::Integer(|r: &mut Geometry, v| r.x = v))
        .bind_field("y", Field::Integer(|r: &mut Geometry, v| r.y = v))
        .bind_field("width", Field::Integer(|r: &mut Geometry, v| r.width = v))
        .bind_field("height", Field::Integer(|r: &mut Geometry, v| r.height = v))
}

/// Build the schema for one element of a workspace payload.
pub fn element_schema() -> ObjectSchema<Workspace, ModelBuilder> {
    ObjectSchema::<Workspace, ModelBuilder>::new()
        .bind_field("num", Field::Integer(|ws: &mut Workspace, v| ws.num = v))
        .bind_callback("name", ValueKind::String, on_name)
        .bind_field("visible", Field::Boolean(|ws: &mut Workspace, v| ws.visible = v))
        .bind_field("focused", Field::Boolean(|ws: &mut Workspace, v| ws.focused = v))
        .bind_field("urgent", Field::Boolean(|ws: &mut Workspace, v| ws.urgent = v))
        .bind_nested("rect", geometry_schema(), workspace_rect)
        .bind_callback("output", ValueKind::String, on_output)
        .require("name")
        .require("output")
}

/// Build the schema for a full workspace payload.
///
/// Every element gets a fresh [`Workspace::unassigned`] (its geometry
/// included) and is attached to its output once the element is complete.
pub fn workspace_schema() -> ArraySchema<Workspace, ModelBuilder> {
    ArraySchema::new(element_schema(), Workspace::unassigned, commit)
}
