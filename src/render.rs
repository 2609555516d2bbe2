//! Plain-text rendering of the model.
//!
//! One line per output that has workspaces:
//!
//! ```text
//! HDMI1: (1) 2! 4
//! LVDS1: [3]
//! ```
//!
//! `[name]` marks the focused workspace, `(name)` a visible but unfocused
//! one, and a trailing `!` an urgent one.

use crate::model::{Output, OutputDirectory, Workspace};
use crate::traits::Renderer;
use std::io::{self, Write};

/// Format a single workspace label.
pub fn workspace_label(ws: &Workspace) -> String {
    let mut label = if ws.focused {
        format!("[{}]", ws.name)
    } else if ws.visible {
        format!("({})", ws.name)
    } else {
        ws.name.clone()
    };
    if ws.urgent {
        label.push('!');
    }
    label
}

/// Format one output's line.
pub fn output_line(output: &Output) -> String {
    let labels: Vec<String> = output.workspaces().iter().map(workspace_label).collect();
    format!("{}: {}", output.name(), labels.join(" "))
}

/// Writes the model as text to any [`Write`] sink.
pub struct TextRenderer<W> {
    out: W,
}

impl TextRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, model: &OutputDirectory) -> io::Result<()> {
        let mut drawn = 0;
        for output in model.iter().filter(|o| !o.workspaces().is_empty()) {
            writeln!(self.out, "{}", output_line(output))?;
            drawn += 1;
        }
        if drawn == 0 {
            writeln!(self.out, "no workspaces")?;
        }
        self.out.flush()
    }
}
