//! Canvas-style arcs for [`tiny_skia::PathBuilder`], which only speaks lines and Béziers.

use std::f32::consts::{FRAC_PI_2, TAU};

pub trait ArcExt {
    /// Start a new subpath along the circle at `(cx, cy)` of radius `r`, from angle `start` to `end`.
    ///
    /// Angles are radians, increasing clockwise on screen (y points down). A sweep of `TAU` or more is a full circle,
    /// otherwise `end` wraps to lie after `start`, so `(PI, 0)` is the upper half.
    fn arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32);
    /// A full circle.
    fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.arc(cx, cy, r, 0.0, TAU);
    }
}

impl ArcExt for tiny_skia::PathBuilder {
    fn arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32) {
        let raw_sweep = end - start;
        let sweep = if raw_sweep >= TAU {
            TAU
        } else {
            raw_sweep.rem_euclid(TAU)
        };
        let at = |angle: f32| (cx + r * angle.cos(), cy + r * angle.sin());

        let (x, y) = at(start);
        self.move_to(x, y);
        if sweep <= 0.0 {
            return;
        }

        // One cubic per quarter turn keeps the error well under a hundredth of a pixel at template sizes.
        // Small positive count, truncation is fine.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = (sweep / FRAC_PI_2).ceil().max(1.0) as u32;
        #[allow(clippy::cast_precision_loss)]
        let step = sweep / segments as f32;
        let handle = 4.0 / 3.0 * (step / 4.0).tan() * r;

        let mut a0 = start;
        for _ in 0..segments {
            let a1 = a0 + step;
            let (x0, y0) = at(a0);
            let (x1, y1) = at(a1);
            self.cubic_to(
                x0 - handle * a0.sin(),
                y0 + handle * a0.cos(),
                x1 + handle * a1.sin(),
                y1 - handle * a1.cos(),
                x1,
                y1,
            );
            a0 = a1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::ArcExt;
    use std::f32::consts::PI;

    #[test]
    fn circle_bounds() {
        let mut pb = tiny_skia::PathBuilder::new();
        pb.circle(50.0, 40.0, 10.0);
        let bounds = pb.finish().unwrap().bounds();
        assert!((bounds.left() - 40.0).abs() < 0.01);
        assert!((bounds.right() - 60.0).abs() < 0.01);
        assert!((bounds.top() - 30.0).abs() < 0.01);
        assert!((bounds.bottom() - 50.0).abs() < 0.01);
    }
    #[test]
    fn lower_half() {
        // 0 -> PI sweeps clockwise through the bottom of the circle.
        let mut pb = tiny_skia::PathBuilder::new();
        pb.arc(0.0, 0.0, 10.0, 0.0, PI);
        let bounds = pb.finish().unwrap().bounds();
        assert!(bounds.top() > -0.01);
        assert!((bounds.bottom() - 10.0).abs() < 0.01);
    }
    #[test]
    fn upper_half_wraps() {
        // PI -> 0 wraps around through the top.
        let mut pb = tiny_skia::PathBuilder::new();
        pb.arc(0.0, 0.0, 10.0, PI, 0.0);
        let bounds = pb.finish().unwrap().bounds();
        assert!(bounds.bottom() < 0.01);
        assert!((bounds.top() + 10.0).abs() < 0.01);
    }
}
