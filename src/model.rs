//! The workspace model.
//!
//! An [`OutputDirectory`] holds every known [`Output`] in first-seen order.
//! Each output owns its [`Workspace`]s in the order the window manager
//! listed them, and each workspace owns its [`Geometry`].
//!
//! Outputs are never removed: a rebuild empties every output's workspace
//! list but keeps the outputs themselves, so the directory order stays stable
//! across updates.

use crate::shaping::ShapedText;
use log::debug;
use std::collections::TryReserveError;

/// On-screen rectangle of a workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A single workspace as reported by the window manager.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    /// Workspace number, or [`Workspace::UNASSIGNED_NUM`] if the payload did
    /// not supply one.
    pub num: i32,
    /// Display name.
    pub name: String,
    /// The name pre-shaped for drawing.
    pub label: ShapedText,
    pub visible: bool,
    pub focused: bool,
    pub urgent: bool,
    pub rect: Geometry,
    /// Name of the owning output.  Empty until the `output` key is parsed.
    pub output: String,
}

impl Workspace {
    /// Sentinel for a workspace whose number has not been assigned.
    pub const UNASSIGNED_NUM: i32 = -1;

    /// A blank workspace: every field zeroed except `num`, which is
    /// [`UNASSIGNED_NUM`](Self::UNASSIGNED_NUM).
    pub fn unassigned() -> Self {
        Self {
            num: Self::UNASSIGNED_NUM,
            name: String::new(),
            label: ShapedText::default(),
            visible: false,
            focused: false,
            urgent: false,
            rect: Geometry::default(),
            output: String::new(),
        }
    }
}

/// A physical output (monitor) and the workspaces shown on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    name: String,
    workspaces: Vec<Workspace>,
}

impl Output {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            workspaces: Vec::new(),
        }
    }

    /// The output's name, e.g. `"LVDS1"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Workspaces on this output, in payload order.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// The focused workspace on this output, if any.
    pub fn focused_workspace(&self) -> Option<&Workspace> {
        self.workspaces.iter().find(|ws| ws.focused)
    }

    /// Append `workspace` at the end of the list.
    ///
    /// Growth is checked: if the list cannot reserve room the workspace is
    /// dropped and the allocation error returned.
    fn push(&mut self, workspace: Workspace) -> Result<(), TryReserveError> {
        self.workspaces.try_reserve(1)?;
        self.workspaces.push(workspace);
        Ok(())
    }
}

/// All known outputs, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputDirectory {
    outputs: Vec<Output>,
}

impl OutputDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an output by exact name.
    pub fn get(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// Return the output called `name`, creating it at the end of the
    /// directory if it does not exist yet.
    pub fn get_or_create(&mut self, name: &str) -> &mut Output {
        let index = match self.outputs.iter().position(|o| o.name == name) {
            Some(index) => index,
            None => {
                debug!("new output {:?}", name);
                self.outputs.push(Output::new(name));
                self.outputs.len() - 1
            }
        };
        &mut self.outputs[index]
    }

    /// Hand `workspace` over to the output named in its `output` field,
    /// appending it to that output's list.
    pub fn attach(&mut self, workspace: Workspace) -> Result<(), TryReserveError> {
        let owner = workspace.output.clone();
        self.get_or_create(&owner).push(workspace)
    }

    /// Drop every workspace while keeping the outputs.
    ///
    /// Returns how many workspaces were released.
    pub fn release(&mut self) -> usize {
        self.outputs
            .iter_mut()
            .map(|output| {
                let count = output.workspaces.len();
                output.workspaces.clear();
                count
            })
            .sum()
    }

    /// Iterate over outputs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter()
    }

    /// Iterate over every workspace, output by output.
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.outputs.iter().flat_map(|o| o.workspaces.iter())
    }

    /// Number of known outputs, including those with no workspaces.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Total number of workspaces across all outputs.
    pub fn workspace_count(&self) -> usize {
        self.outputs.iter().map(|o| o.workspaces.len()).sum()
    }
}

//  Tests
