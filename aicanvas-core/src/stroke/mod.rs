//! # Strokes
//!
//! Turns a begin/extend/end sequence of surface points into paint. Strokes are not retained - each segment is
//! rasterized into the [`Surface`] as it arrives, and only the "last point" bookkeeping survives between events.
//!
//! ```text
//!          begin            end / leave
//!   Idle ---------> Drawing ------------> Idle
//!                   |     ^
//!                   +-----+ extend (paints one segment)
//! ```

use crate::{
    brush::{BrushConfig, BrushSampling, Composition, Pen},
    input::Point,
    surface::Surface,
};

/// How consecutive samples are joined.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Smoothing {
    /// Straight segments. The painted path passes through every sample.
    #[default]
    Linear,
    /// Quadratic curves using each sample as a control point, ending at the midpoint towards the next sample.
    /// Smoother, but only passes *near* the samples, and the last half-segment is never painted.
    Midpoint,
}

/// Per-stroke state, captured at [`StrokeRenderer::begin`].
#[derive(Copy, Clone, Debug)]
struct ActiveStroke {
    /// The most recent sample.
    last: Point,
    /// Where the painted path currently ends. Equal to `last` for linear smoothing.
    tail: Point,
    brush: BrushConfig,
    composition: Composition,
}

#[derive(Debug, Default)]
pub struct StrokeRenderer {
    smoothing: Smoothing,
    sampling: BrushSampling,
    active: Option<ActiveStroke>,
}
impl StrokeRenderer {
    #[must_use]
    pub fn new(smoothing: Smoothing, sampling: BrushSampling) -> Self {
        Self {
            smoothing,
            sampling,
            active: None,
        }
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
    #[must_use]
    pub fn sampling(&self) -> BrushSampling {
        self.sampling
    }
    /// Start a stroke at `point`. Paints nothing.
    ///
    /// If a stroke was already in progress it is abandoned, keeping whatever it already painted.
    pub fn begin(&mut self, point: Point, brush: &BrushConfig) {
        if self.active.is_some() {
            log::debug!("stroke restarted without ending");
        }
        self.active = Some(ActiveStroke {
            last: point,
            tail: point,
            brush: *brush,
            composition: brush.tool.composition(),
        });
    }
    /// Paint from the previous sample towards `point`. Returns true if any segment was painted.
    ///
    /// `brush` is the live toolbar state, only consulted under [`BrushSampling::PerSegment`].
    pub fn extend(&mut self, point: Point, brush: &BrushConfig, surface: &mut Surface) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        // Repeated samples add nothing and would make a degenerate path.
        if active.last == point {
            return false;
        }

        let source = match self.sampling {
            BrushSampling::StrokeStart => &active.brush,
            BrushSampling::PerSegment => brush,
        };
        let pen = Pen {
            composition: active.composition,
            ..Pen::from_brush(source, surface.density())
        };

        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(active.tail.x, active.tail.y);
        let new_tail = match self.smoothing {
            Smoothing::Linear => {
                pb.line_to(point.x, point.y);
                point
            }
            Smoothing::Midpoint => {
                let mid = active.last.midpoint(point);
                pb.quad_to(active.last.x, active.last.y, mid.x, mid.y);
                mid
            }
        };
        let painted = if let Some(path) = pb.finish() {
            surface.stroke_path(&path, &pen);
            true
        } else {
            false
        };

        active.last = point;
        active.tail = new_tail;
        painted
    }
    /// Finish the stroke. Paints nothing. Returns true if a stroke was actually in progress.
    pub fn end(&mut self) -> bool {
        self.active.take().is_some()
    }
}
