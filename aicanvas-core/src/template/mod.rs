//! # Templates
//!
//! A fixed catalog of simple line drawings the user can drop onto the canvas. Each shape is a handful of arcs, lines,
//! and rectangles around a center point, stroked (and occasionally filled) with the current brush.
//!
//! Shapes land near the middle of the surface, nudged by a random offset so repeated insertions don't stack exactly.

mod arc;

use arc::ArcExt;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::{
    brush::{BrushConfig, Pen},
    input::Point,
    surface::Surface,
};

/// Default edge length of a template, in logical pixels.
pub const BASE_SIZE: f32 = 100.0;
/// Maximum offset of a template from the surface center on each axis, in logical pixels.
pub const MAX_JITTER: f32 = 50.0;

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TemplateShape {
    Circle,
    Square,
    Triangle,
    Star,
    House,
    Tree,
    Car,
    Flower,
    HappyFace,
    SadFace,
    CatFace,
    DogFace,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::AsRefStr, strum::EnumIter)]
pub enum TemplateCategory {
    #[strum(serialize = "Basic Shapes")]
    BasicShapes,
    Objects,
    Faces,
}
impl TemplateCategory {
    pub fn shapes(self) -> impl Iterator<Item = TemplateShape> {
        use strum::IntoEnumIterator;
        TemplateShape::iter().filter(move |shape| shape.category() == self)
    }
}

impl TemplateShape {
    #[must_use]
    pub fn category(self) -> TemplateCategory {
        match self {
            Self::Circle | Self::Square | Self::Triangle | Self::Star => {
                TemplateCategory::BasicShapes
            }
            Self::House | Self::Tree | Self::Car | Self::Flower => TemplateCategory::Objects,
            Self::HappyFace | Self::SadFace | Self::CatFace | Self::DogFace => {
                TemplateCategory::Faces
            }
        }
    }
    /// Human readable name, for toolbars.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Square => "Square",
            Self::Triangle => "Triangle",
            Self::Star => "Star",
            Self::House => "House",
            Self::Tree => "Tree",
            Self::Car => "Car",
            Self::Flower => "Flower",
            Self::HappyFace => "Happy Face",
            Self::SadFace => "Sad Face",
            Self::CatFace => "Cat Face",
            Self::DogFace => "Dog Face",
        }
    }
}

/// Where a template ended up.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Placement {
    pub shape: TemplateShape,
    /// Surface pixels.
    pub center: Point,
    /// Surface pixels.
    pub size: f32,
}

/// Surface center, offset by up to [`MAX_JITTER`] logical pixels on each axis.
pub fn jittered_center(surface: &Surface, rng: &mut impl rand::Rng) -> Point {
    let reach = MAX_JITTER * surface.density();
    let center = surface.center();
    Point::new(
        center.x + rng.gen_range(-reach..reach),
        center.y + rng.gen_range(-reach..reach),
    )
}

/// Draw `shape` near the middle of the surface with the brush's color and width.
///
/// Templates always paint, even while the eraser is the selected tool.
pub fn draw_template(
    surface: &mut Surface,
    shape: TemplateShape,
    brush: &BrushConfig,
    base_size: f32,
    rng: &mut impl rand::Rng,
) -> Placement {
    let placement = Placement {
        shape,
        center: jittered_center(surface, rng),
        size: base_size * surface.density(),
    };
    let pen = Pen::painting(brush, surface.density());
    draw_at(surface, &pen, placement);
    log::debug!(
        "placed {shape} at ({:.1}, {:.1})",
        placement.center.x,
        placement.center.y
    );
    placement
}

/// Draw a template exactly at `placement`.
pub fn draw_at(surface: &mut Surface, pen: &Pen, placement: Placement) {
    let Placement {
        shape,
        center: Point { x, y },
        size: s,
    } = placement;
    let mut painter = Painter { surface, pen };

    match shape {
        TemplateShape::Circle => painter.stroke(|pb| pb.circle(x, y, s / 2.0)),
        TemplateShape::Square => painter.stroke(|pb| rect(pb, x - s / 2.0, y - s / 2.0, s, s)),
        TemplateShape::Triangle => painter.stroke(|pb| {
            pb.move_to(x, y - s / 2.0);
            pb.line_to(x - s / 2.0, y + s / 2.0);
            pb.line_to(x + s / 2.0, y + s / 2.0);
            pb.close();
        }),
        TemplateShape::Star => painter.stroke(|pb| star(pb, x, y, 5, s / 2.0, s / 4.0)),
        TemplateShape::House => {
            // Walls
            painter.stroke(|pb| rect(pb, x - s / 2.0, y, s, s * 0.6));
            // Roof
            painter.stroke(|pb| {
                pb.move_to(x - s / 2.0, y);
                pb.line_to(x, y - s / 3.0);
                pb.line_to(x + s / 2.0, y);
            });
            // Door
            painter.stroke(|pb| rect(pb, x - s / 8.0, y + s * 0.2, s / 4.0, s * 0.4));
            // Window
            painter.stroke(|pb| rect(pb, x + s / 8.0, y + s * 0.1, s / 4.0, s / 4.0));
        }
        TemplateShape::Tree => {
            painter.stroke(|pb| rect(pb, x - s / 8.0, y + s / 4.0, s / 4.0, s / 2.0));
            painter.stroke(|pb| pb.circle(x, y, s / 3.0));
        }
        TemplateShape::Car => {
            // Body, then cabin
            painter.stroke(|pb| rect(pb, x - s / 2.0, y - s / 4.0, s, s / 2.0));
            painter.stroke(|pb| rect(pb, x - s / 4.0, y - s / 2.0, s / 2.0, s / 4.0));
            // Wheels
            for dx in [-s / 4.0, s / 4.0] {
                painter.stroke(|pb| pb.circle(x + dx, y + s / 4.0, s / 8.0));
            }
        }
        TemplateShape::Flower => {
            painter.stroke(|pb| pb.circle(x, y, s / 8.0));
            for i in 0..6u8 {
                let angle = f32::from(i) * PI / 3.0;
                let (px, py) = (x + s / 3.0 * angle.cos(), y + s / 3.0 * angle.sin());
                painter.stroke(|pb| pb.circle(px, py, s / 6.0));
            }
            // Stem
            painter.stroke(|pb| {
                pb.move_to(x, y + s / 8.0);
                pb.line_to(x, y + s / 2.0);
            });
        }
        TemplateShape::HappyFace => {
            face(&mut painter, x, y, s);
            // Smile, through the bottom.
            painter.stroke(|pb| pb.arc(x, y, s / 4.0, 0.0, PI));
        }
        TemplateShape::SadFace => {
            face(&mut painter, x, y, s);
            // Frown, through the top.
            painter.stroke(|pb| pb.arc(x, y + s / 3.0, s / 4.0, PI, 0.0));
        }
        TemplateShape::CatFace => {
            face(&mut painter, x, y, s);
            // Pointy ears
            for side in [-1.0, 1.0] {
                painter.stroke(|pb| {
                    pb.move_to(x + side * s / 3.0, y - s / 3.0);
                    pb.line_to(x + side * s / 6.0, y - s / 2.0);
                    pb.line_to(x + side * s / 8.0, y - s / 4.0);
                });
            }
            // Nose
            painter.fill(|pb| {
                pb.move_to(x, y);
                pb.line_to(x - s / 20.0, y + s / 20.0);
                pb.line_to(x + s / 20.0, y + s / 20.0);
                pb.close();
            });
            // Whiskers
            painter.stroke(|pb| {
                pb.move_to(x - s / 3.0, y);
                pb.line_to(x - s / 8.0, y);
                pb.move_to(x + s / 8.0, y);
                pb.line_to(x + s / 3.0, y);
            });
        }
        TemplateShape::DogFace => {
            face(&mut painter, x, y, s);
            // Floppy ears
            for side in [-1.0, 1.0] {
                painter.stroke(|pb| pb.circle(x + side * s / 3.0, y - s / 4.0, s / 6.0));
            }
            // Nose
            painter.fill(|pb| pb.circle(x, y + s / 12.0, s / 20.0));
            // Mouth and tongue
            painter.stroke(|pb| pb.arc(x, y + s / 6.0, s / 8.0, 0.0, PI));
            painter.fill(|pb| pb.arc(x, y + s / 4.0, s / 12.0, 0.0, PI));
        }
    }
}

/// Head outline and two filled eyes, shared by every face.
fn face(painter: &mut Painter<'_>, x: f32, y: f32, s: f32) {
    painter.stroke(|pb| pb.circle(x, y, s / 2.0));
    for dx in [-s / 6.0, s / 6.0] {
        painter.fill(|pb| pb.circle(x + dx, y - s / 8.0, s / 20.0));
    }
}

fn rect(pb: &mut tiny_skia::PathBuilder, x: f32, y: f32, w: f32, h: f32) {
    if let Some(rect) = tiny_skia::Rect::from_xywh(x, y, w, h) {
        pb.push_rect(rect);
    }
}

/// A closed star with `points` tips, first tip straight up.
fn star(pb: &mut tiny_skia::PathBuilder, x: f32, y: f32, points: u8, outer: f32, inner: f32) {
    let step = PI / f32::from(points);
    for i in 0..2 * points {
        let radius = if i % 2 == 0 { outer } else { inner };
        let theta = f32::from(i) * step - FRAC_PI_2;
        let (px, py) = (x + radius * theta.cos(), y + radius * theta.sin());
        if i == 0 {
            pb.move_to(px, py);
        } else {
            pb.line_to(px, py);
        }
    }
    pb.close();
}

struct Painter<'a> {
    surface: &'a mut Surface,
    pen: &'a Pen,
}
impl Painter<'_> {
    fn stroke(&mut self, build: impl FnOnce(&mut tiny_skia::PathBuilder)) {
        let mut pb = tiny_skia::PathBuilder::new();
        build(&mut pb);
        if let Some(path) = pb.finish() {
            self.surface.stroke_path(&path, self.pen);
        }
    }
    fn fill(&mut self, build: impl FnOnce(&mut tiny_skia::PathBuilder)) {
        let mut pb = tiny_skia::PathBuilder::new();
        build(&mut pb);
        if let Some(path) = pb.finish() {
            self.surface.fill_path(&path, self.pen);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{
        draw_at, draw_template, Placement, TemplateCategory, TemplateShape, BASE_SIZE, MAX_JITTER,
    };
    use crate::{
        brush::{BrushAction, BrushConfig, Pen, Tool},
        color::Color,
        input::Point,
        surface::Surface,
    };
    use rand::SeedableRng;
    use strum::IntoEnumIterator;

    const GREEN: Color = Color::rgb(0, 160, 0);

    fn rng(seed: u64) -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(seed)
    }
    /// Bounding box of every pixel exactly matching `color`, as `[left, top, right, bottom]`.
    fn bounds_of(surface: &Surface, color: Color) -> Option<[u32; 4]> {
        let mut bounds: Option<[u32; 4]> = None;
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                if surface.pixel(x, y) == Some(color) {
                    let b = bounds.get_or_insert([x, y, x, y]);
                    b[0] = b[0].min(x);
                    b[1] = b[1].min(y);
                    b[2] = b[2].max(x);
                    b[3] = b[3].max(y);
                }
            }
        }
        bounds
    }

    #[test]
    fn names_and_categories() {
        assert_eq!(TemplateShape::iter().count(), 12);
        assert_eq!("happy_face".parse::<TemplateShape>(), Ok(TemplateShape::HappyFace));
        assert_eq!(TemplateShape::DogFace.to_string(), "dog_face");
        assert_eq!(TemplateCategory::BasicShapes.as_ref(), "Basic Shapes");
        for category in TemplateCategory::iter() {
            assert_eq!(category.shapes().count(), 4);
        }
    }
    #[test]
    fn every_shape_paints_near_center() {
        for shape in TemplateShape::iter() {
            let mut surface = Surface::new(300, 300, 1.0).unwrap();
            let brush = BrushConfig::new(Tool::Pen, GREEN, 3);
            let placement = draw_template(&mut surface, shape, &brush, BASE_SIZE, &mut rng(7));
            assert!(!surface.is_blank(), "{shape} painted nothing");

            let [left, top, right, bottom] = bounds_of(&surface, GREEN).unwrap();
            // Every shape fits in a box a bit bigger than its size. The tree's trunk hangs lowest.
            #[allow(clippy::cast_precision_loss)]
            let (w, h) = ((right - left) as f32, (bottom - top) as f32);
            assert!(w <= BASE_SIZE * 1.2 && h <= BASE_SIZE * 1.2, "{shape} too large");
            assert!((placement.center.x - 150.0).abs() <= MAX_JITTER);
            assert!((placement.center.y - 150.0).abs() <= MAX_JITTER);
        }
    }
    #[test]
    fn jittered_circles_differ() {
        let brush = BrushConfig::new(Tool::Pen, GREEN, 4);
        let mut rng = rng(42);
        let mut draw = || {
            let mut surface = Surface::new(300, 300, 1.0).unwrap();
            let placement =
                draw_template(&mut surface, TemplateShape::Circle, &brush, BASE_SIZE, &mut rng);
            (surface, placement)
        };
        let (first, first_at) = draw();
        let (second, second_at) = draw();
        assert_ne!(first.data(), second.data());
        assert_ne!(first_at.center, second_at.center);

        for (surface, placement) in [(first, first_at), (second, second_at)] {
            let [left, top, right, bottom] = bounds_of(&surface, GREEN).unwrap();
            #[allow(clippy::cast_precision_loss)]
            let found = Point::new((left + right) as f32 / 2.0, (top + bottom) as f32 / 2.0);
            // Circle of diameter 100 plus the pen width.
            #[allow(clippy::cast_precision_loss)]
            let diameter = (right - left) as f32;
            assert!((diameter - BASE_SIZE).abs() <= 6.0, "diameter {diameter}");
            assert!(found.distance(placement.center) < 2.0);
            assert!((found.x - 150.0).abs() <= MAX_JITTER + 1.0);
            assert!((found.y - 150.0).abs() <= MAX_JITTER + 1.0);
            // Hollow.
            assert_eq!(
                surface.pixel(placement.center.x as u32, placement.center.y as u32),
                Some(Color::WHITE)
            );
        }
    }
    #[test]
    fn template_then_clear_is_blank() {
        let mut surface = Surface::new(200, 200, 1.0).unwrap();
        draw_template(
            &mut surface,
            TemplateShape::Circle,
            &BrushConfig::default(),
            BASE_SIZE,
            &mut rng(1),
        );
        surface.clear();
        let fresh = Surface::new(200, 200, 1.0).unwrap();
        assert_eq!(surface.data(), fresh.data());
    }
    #[test]
    fn eraser_brush_still_paints() {
        let mut surface = Surface::new(200, 200, 1.0).unwrap();
        let brush = BrushConfig::new(Tool::Pen, GREEN, 3).reduce(BrushAction::SetTool(Tool::Eraser));
        draw_template(&mut surface, TemplateShape::Square, &brush, BASE_SIZE, &mut rng(3));
        assert!(bounds_of(&surface, GREEN).is_some());
        assert_eq!(surface.opaque_pixels(), 200 * 200);
    }
    #[test]
    fn faces_have_filled_eyes() {
        let mut surface = Surface::new(200, 200, 1.0).unwrap();
        let pen = Pen::from_brush(&BrushConfig::new(Tool::Pen, GREEN, 2), 1.0);
        let placement = Placement {
            shape: TemplateShape::HappyFace,
            center: Point::new(100.0, 100.0),
            size: 100.0,
        };
        draw_at(&mut surface, &pen, placement);
        // Left eye center: (100 - 100/6, 100 - 100/8)
        assert_eq!(surface.pixel(83, 87), Some(GREEN));
        // Inside the head, away from features.
        assert_eq!(surface.pixel(100, 80), Some(Color::WHITE));
    }
}
