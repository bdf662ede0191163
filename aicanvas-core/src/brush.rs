//! # Brush
//!
//! The current tool, color, and width. Held as an immutable snapshot, replaced wholesale by [`BrushConfig::reduce`]
//! so that the toolbar is the only writer and readers never observe a half-applied change.

use crate::color::Color;

/// Inclusive range of stroke widths, in logical pixels.
pub const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}
impl Tool {
    #[must_use]
    pub fn composition(self) -> Composition {
        match self {
            Self::Pen => Composition::Paint,
            Self::Eraser => Composition::Erase,
        }
    }
}

/// How a stroke's pixels combine with what's already on the surface.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Composition {
    /// Source-over.
    Paint,
    /// Destination-out. Removes coverage instead of painting white, so erasing stays correct
    /// over a non-white background.
    Erase,
}
impl Composition {
    #[must_use]
    pub fn blend_mode(self) -> tiny_skia::BlendMode {
        match self {
            Self::Paint => tiny_skia::BlendMode::SourceOver,
            Self::Erase => tiny_skia::BlendMode::DestinationOut,
        }
    }
}

/// When a stroke reads the color and width of the brush.
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
pub enum BrushSampling {
    /// Color and width are fixed when the stroke begins.
    #[default]
    StrokeStart,
    /// Color and width are re-read for every segment, so toolbar changes show up mid-stroke.
    /// Composition is still fixed at stroke start.
    PerSegment,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BrushConfig {
    pub tool: Tool,
    pub color: Color,
    /// Logical pixels, always within [`WIDTH_RANGE`].
    width: u32,
}
impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Color::rgb(0x25, 0x63, 0xeb),
            width: 3,
        }
    }
}
impl BrushConfig {
    #[must_use]
    pub fn new(tool: Tool, color: Color, width: u32) -> Self {
        Self {
            tool,
            color,
            width: clamp_width(width),
        }
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    /// Apply a toolbar action, producing the next state.
    #[must_use = "returns the new state without modifying `self`"]
    pub fn reduce(self, action: BrushAction) -> Self {
        match action {
            BrushAction::SetTool(tool) => Self { tool, ..self },
            BrushAction::SetColor(color) => Self { color, ..self },
            BrushAction::SetWidth(width) => Self {
                width: clamp_width(width),
                ..self
            },
        }
    }
}

fn clamp_width(width: u32) -> u32 {
    width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end())
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BrushAction {
    SetTool(Tool),
    SetColor(Color),
    /// Clamped into [`WIDTH_RANGE`].
    SetWidth(u32),
}

/// Everything a single painted segment needs, resolved into surface pixels.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Pen {
    pub color: Color,
    pub width_px: f32,
    pub composition: Composition,
}
impl Pen {
    /// Resolve a brush at the given surface density.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_brush(brush: &BrushConfig, density: f32) -> Self {
        Self {
            color: brush.color,
            width_px: brush.width() as f32 * density,
            composition: brush.tool.composition(),
        }
    }
    /// Pen color and width, with normal compositing regardless of tool.
    #[must_use]
    pub fn painting(brush: &BrushConfig, density: f32) -> Self {
        Self {
            composition: Composition::Paint,
            ..Self::from_brush(brush, density)
        }
    }
    #[must_use]
    pub fn paint(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(self.color.to_skia());
        paint.anti_alias = true;
        paint.blend_mode = self.composition.blend_mode();
        paint
    }
    #[must_use]
    pub fn stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width_px,
            line_cap: tiny_skia::LineCap::Round,
            line_join: tiny_skia::LineJoin::Round,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::{BrushAction, BrushConfig, Composition, Pen, Tool};
    use crate::color::Color;

    #[test]
    fn width_clamped() {
        let brush = BrushConfig::default();
        assert_eq!(brush.reduce(BrushAction::SetWidth(0)).width(), 1);
        assert_eq!(brush.reduce(BrushAction::SetWidth(500)).width(), 50);
        assert_eq!(brush.reduce(BrushAction::SetWidth(12)).width(), 12);
        assert_eq!(BrushConfig::new(Tool::Pen, Color::BLACK, 99).width(), 50);
    }
    #[test]
    fn reduce_touches_one_field() {
        let brush = BrushConfig::default();
        let erased = brush.reduce(BrushAction::SetTool(Tool::Eraser));
        assert_eq!(erased.tool, Tool::Eraser);
        assert_eq!(erased.color, brush.color);
        assert_eq!(erased.width(), brush.width());

        let red = erased.reduce(BrushAction::SetColor(Color::rgb(255, 0, 0)));
        assert_eq!(red.tool, Tool::Eraser);
        assert_eq!(red.color, Color::rgb(255, 0, 0));
    }
    #[test]
    fn tool_names() {
        assert_eq!("eraser".parse::<Tool>(), Ok(Tool::Eraser));
        assert_eq!("Pen".parse::<Tool>(), Ok(Tool::Pen));
        assert_eq!(Tool::Eraser.as_ref(), "eraser");
    }
    #[test]
    fn pen_scales_with_density() {
        let brush = BrushConfig::new(Tool::Eraser, Color::BLACK, 4);
        let pen = Pen::from_brush(&brush, 2.0);
        assert!((pen.width_px - 8.0).abs() < f32::EPSILON);
        assert_eq!(pen.composition, Composition::Erase);
        assert_eq!(Pen::painting(&brush, 1.0).composition, Composition::Paint);
    }
}
