//! # Canvas
//!
//! Ties the drawing pieces together behind the operations a host view needs: pointer events, toolbar actions,
//! templates, clear, resize, and export. The canvas is single-owner and synchronous; the host feeds it events and
//! polls it on its own schedule.

use std::time::{Duration, Instant};

use rand::SeedableRng;

use crate::{
    brush::{BrushAction, BrushConfig, BrushSampling},
    input::{normalize, BoundingBox, PointerEvent},
    settle::Quiescence,
    snapshot::{Snapshot, SnapshotError},
    stroke::{Smoothing, StrokeRenderer},
    surface::{Surface, SurfaceError},
    template::{draw_template, Placement, TemplateShape, BASE_SIZE},
};

/// The collaborator that consumes finished drawings.
///
/// In the full application this uploads the snapshot for analysis, but the canvas doesn't care.
pub trait DrawingObserver {
    /// Drawing activity has settled. Called at most once per burst of strokes/templates.
    fn on_snapshot(&mut self, snapshot: &Snapshot);
    /// The canvas was wiped. Any context derived from earlier snapshots is stale.
    fn on_cleared(&mut self) {}
}

#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasSettings {
    /// Size of the drawing element, in logical pixels.
    pub logical_width: f32,
    pub logical_height: f32,
    /// Device pixel ratio at creation.
    pub density: f32,
    pub smoothing: Smoothing,
    pub sampling: BrushSampling,
    /// Quiet period after a stroke ends before a snapshot is taken.
    pub stroke_settle: Duration,
    /// Quiet period after a template is placed before a snapshot is taken.
    pub template_settle: Duration,
    /// Template size in logical pixels.
    pub template_size: f32,
    /// Seed for template placement. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Initial toolbar state.
    pub brush: BrushConfig,
}
impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            logical_width: 800.0,
            logical_height: 600.0,
            density: 1.0,
            smoothing: Smoothing::default(),
            sampling: BrushSampling::default(),
            stroke_settle: Duration::from_millis(1000),
            template_settle: Duration::from_millis(500),
            template_size: BASE_SIZE,
            seed: None,
            brush: BrushConfig::default(),
        }
    }
}

pub struct Canvas {
    surface: Surface,
    brush: BrushConfig,
    renderer: StrokeRenderer,
    settle: Quiescence,
    settings: CanvasSettings,
    rng: rand::rngs::StdRng,
    observer: Option<Box<dyn DrawingObserver + Send>>,
}
impl Canvas {
    pub fn new(settings: CanvasSettings) -> Result<Self, CanvasError> {
        let surface = Surface::with_logical_size(
            settings.logical_width,
            settings.logical_height,
            settings.density,
        )?;
        let rng = match settings.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };
        Ok(Self {
            surface,
            brush: settings.brush,
            renderer: StrokeRenderer::new(settings.smoothing, settings.sampling),
            settle: Quiescence::new(),
            settings,
            rng,
            observer: None,
        })
    }
    /// Replace the observer, returning the old one.
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn DrawingObserver + Send>>,
    ) -> Option<Box<dyn DrawingObserver + Send>> {
        std::mem::replace(&mut self.observer, observer)
    }
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
    #[must_use]
    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }
    #[must_use]
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.renderer.is_drawing()
    }
    /// Apply a toolbar action. Returns the new brush.
    pub fn dispatch(&mut self, action: BrushAction) -> BrushConfig {
        self.brush = self.brush.reduce(action);
        self.brush
    }
    /// Pointer or touch went down. Returns true if a stroke began.
    pub fn pointer_down(&mut self, event: &PointerEvent, bounds: &impl BoundingBox) -> bool {
        match normalize(event, bounds, self.surface.density()) {
            Ok(point) => {
                // A new burst of activity, the previous one hasn't settled.
                self.settle.cancel();
                self.renderer.begin(point, &self.brush);
                true
            }
            Err(e) => {
                log::warn!("ignoring pointer down: {e}");
                false
            }
        }
    }
    /// Pointer or touch moved. Returns true if anything was painted.
    pub fn pointer_move(&mut self, event: &PointerEvent, bounds: &impl BoundingBox) -> bool {
        if !self.renderer.is_drawing() {
            return false;
        }
        match normalize(event, bounds, self.surface.density()) {
            Ok(point) => self.renderer.extend(point, &self.brush, &mut self.surface),
            Err(e) => {
                log::warn!("ignoring pointer move: {e}");
                false
            }
        }
    }
    /// Pointer or touch released. Returns true if a stroke ended.
    pub fn pointer_up(&mut self, now: Instant) -> bool {
        let ended = self.renderer.end();
        if ended {
            self.settle.arm(now, self.settings.stroke_settle);
        }
        ended
    }
    /// Pointer left the element. Ends the stroke like a release would.
    pub fn pointer_leave(&mut self, now: Instant) -> bool {
        self.pointer_up(now)
    }
    /// Drop a template near the center using the current brush.
    pub fn draw_template(&mut self, shape: TemplateShape, now: Instant) -> Placement {
        let placement = draw_template(
            &mut self.surface,
            shape,
            &self.brush,
            self.settings.template_size,
            &mut self.rng,
        );
        self.settle.arm(now, self.settings.template_settle);
        placement
    }
    /// Wipe to white, drop any pending snapshot, and tell the observer.
    pub fn clear(&mut self) {
        self.renderer.end();
        self.surface.clear();
        self.settle.cancel();
        log::debug!("canvas cleared");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_cleared();
        }
    }
    /// The hosting element changed size. **Destroys all content**, like a browser canvas does.
    pub fn resize(
        &mut self,
        logical_width: f32,
        logical_height: f32,
        density: f32,
    ) -> Result<(), CanvasError> {
        let [width, height] =
            crate::surface::physical_size(logical_width, logical_height, density)?;
        self.surface.resize(width, height, density)?;
        self.settings.logical_width = logical_width;
        self.settings.logical_height = logical_height;
        self.settings.density = density;
        self.renderer.end();
        // Nothing left worth exporting.
        self.settle.cancel();
        log::debug!("canvas resized to {width}x{height}, content discarded");
        Ok(())
    }
    /// Encode the surface right now.
    pub fn export(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::capture(&self.surface)
    }
    /// When the host should next call [`Canvas::poll`], if ever.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.settle.deadline()
    }
    /// If activity has settled, export and hand the snapshot to the observer.
    pub fn poll(&mut self, now: Instant) -> Result<Option<Snapshot>, SnapshotError> {
        if !self.settle.poll(now) {
            return Ok(None);
        }
        let snapshot = self.export()?;
        log::debug!("drawing settled, emitting {snapshot:?}");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_snapshot(&snapshot);
        }
        Ok(Some(snapshot))
    }
}
impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("surface", &self.surface)
            .field("brush", &self.brush)
            .field("drawing", &self.renderer.is_drawing())
            .field("deadline", &self.settle.deadline())
            .finish_non_exhaustive()
    }
}
