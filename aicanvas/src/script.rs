//! # Scripts
//!
//! Recorded input for the canvas: pointer and touch events, toolbar actions and host signals, each with a delay
//! since the previous event. Scripts are TOML:
//!
//! ```toml
//! [layout]
//! left = 10
//! top = 64
//!
//! [[event]]
//! kind = "down"
//! x = 40
//! y = 90
//!
//! [[event]]
//! wait_ms = 16
//! kind = "move"
//! x = 60
//! y = 95
//! ```

use aicanvas_core::{
    brush::{BrushAction, Tool},
    color::Color,
    input::{PointerEvent, TouchPoint},
    template::TemplateShape,
};

/// Where the canvas element sits in client space.
#[derive(serde::Deserialize, Copy, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Layout {
    pub left: f32,
    pub top: f32,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
pub struct Script {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, rename = "event")]
    pub events: Vec<RawEvent>,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
pub struct RawEvent {
    /// Delay since the previous event.
    #[serde(default)]
    pub wait_ms: u64,
    #[serde(flatten)]
    pub kind: RawKind,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawKind {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
    TouchStart { touches: Vec<[f32; 2]> },
    TouchMove { touches: Vec<[f32; 2]> },
    TouchEnd,
    Tool { tool: String },
    Color { color: String },
    Width { width: u32 },
    Template { shape: String },
    Clear,
    Resize {
        width: f32,
        height: f32,
        density: Option<f32>,
    },
    /// Write the surface as it is right now, relative to the output directory.
    Export { path: std::path::PathBuf },
}

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("event {index}: unknown tool {name:?}")]
    Tool { index: usize, name: String },
    #[error("event {index}: {source}")]
    Color {
        index: usize,
        source: aicanvas_core::color::ColorParseError,
    },
    #[error("event {index}: unknown template {name:?}, expected one of {expected}")]
    Template {
        index: usize,
        name: String,
        expected: String,
    },
    #[error("event {index}: touch event with no touches")]
    NoTouches { index: usize },
    #[error("event {index}: export path {path:?} must be a relative path inside the output directory")]
    ExportPath {
        index: usize,
        path: std::path::PathBuf,
    },
}

/// A script event, checked and converted to what the canvas takes.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Down(PointerEvent),
    Move(PointerEvent),
    Up,
    Leave,
    Brush(BrushAction),
    Template(TemplateShape),
    Clear,
    Resize {
        width: f32,
        height: f32,
        density: Option<f32>,
    },
    Export(std::path::PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub wait: std::time::Duration,
    pub command: Command,
}

impl Script {
    pub fn from_toml(string: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(string)
    }
    /// Validate every event up front, so a typo doesn't fail a replay halfway through.
    pub fn compile(&self) -> Result<Vec<Step>, ScriptError> {
        self.events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                Ok(Step {
                    wait: std::time::Duration::from_millis(event.wait_ms),
                    command: event.kind.compile(index)?,
                })
            })
            .collect()
    }
}

impl RawKind {
    fn compile(&self, index: usize) -> Result<Command, ScriptError> {
        let touches = |touches: &[[f32; 2]]| {
            if touches.is_empty() {
                return Err(ScriptError::NoTouches { index });
            }
            Ok(PointerEvent::touch(touches.iter().map(|&[x, y]| {
                TouchPoint {
                    client_x: x,
                    client_y: y,
                }
            })))
        };
        Ok(match self {
            Self::Down { x, y } => Command::Down(PointerEvent::pointer(*x, *y)),
            Self::Move { x, y } => Command::Move(PointerEvent::pointer(*x, *y)),
            Self::Up | Self::TouchEnd => Command::Up,
            Self::Leave => Command::Leave,
            Self::TouchStart { touches: t } => Command::Down(touches(t.as_slice())?),
            Self::TouchMove { touches: t } => Command::Move(touches(t.as_slice())?),
            Self::Tool { tool } => {
                let tool: Tool = tool.parse().map_err(|_| ScriptError::Tool {
                    index,
                    name: tool.clone(),
                })?;
                Command::Brush(BrushAction::SetTool(tool))
            }
            Self::Color { color } => {
                let color: Color = color
                    .parse()
                    .map_err(|source| ScriptError::Color { index, source })?;
                Command::Brush(BrushAction::SetColor(color))
            }
            Self::Width { width } => Command::Brush(BrushAction::SetWidth(*width)),
            Self::Template { shape } => {
                let parsed: TemplateShape = shape.parse().map_err(|_| {
                    use strum::IntoEnumIterator;
                    let expected: Vec<String> = TemplateShape::iter().map(|s| s.to_string()).collect();
                    ScriptError::Template {
                        index,
                        name: shape.clone(),
                        expected: expected.join(", "),
                    }
                })?;
                Command::Template(parsed)
            }
            Self::Clear => Command::Clear,
            Self::Resize {
                width,
                height,
                density,
            } => Command::Resize {
                width: *width,
                height: *height,
                density: *density,
            },
            Self::Export { path } => {
                use std::path::Component;
                // Only plain names, so `output_dir.join(path)` can't climb out.
                let contained = path
                    .components()
                    .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
                let names_a_file = path
                    .components()
                    .any(|c| matches!(c, Component::Normal(_)));
                if !contained || !names_a_file {
                    return Err(ScriptError::ExportPath {
                        index,
                        path: path.clone(),
                    });
                }
                Command::Export(path.clone())
            }
        })
    }
}
