//! Freehand drawing surface for AI Canvas: input normalization, stroke rasterization, template shapes, and
//! snapshot export. Everything network or UI related lives with the host.

pub mod brush;
pub mod canvas;
pub mod color;
pub mod input;
pub mod settle;
pub mod snapshot;
pub mod stroke;
pub mod surface;
pub mod template;

pub use canvas::{Canvas, CanvasError, CanvasSettings, DrawingObserver};
pub use snapshot::Snapshot;
