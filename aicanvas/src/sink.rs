//! Stand-in for the drawing analysis service: settled snapshots are written to disk, and the list of them is the
//! "conversation context" an analyzer would see.

use aicanvas_core::{DrawingObserver, Snapshot};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Context {
    /// Snapshots written since the last clear, oldest first.
    pub snapshots: Vec<PathBuf>,
    /// Every snapshot written, including ones dropped from context.
    pub written: usize,
    pub clears: usize,
}

/// Handle to the sink's context, readable after the sink is moved into a canvas.
pub type SharedContext = std::sync::Arc<parking_lot::Mutex<Context>>;

pub struct FileSink {
    dir: PathBuf,
    context: SharedContext,
}
impl FileSink {
    /// Snapshots go into `dir`, which is created if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            context: SharedContext::default(),
        })
    }
    #[must_use]
    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }
}
impl DrawingObserver for FileSink {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let mut context = self.context.lock();
        let path = self
            .dir
            .join(format!("snapshot-{:04}.png", context.written));
        match std::fs::write(&path, snapshot.png()) {
            Ok(()) => {
                #[allow(clippy::cast_precision_loss)]
                let size = human_bytes::human_bytes(snapshot.png().len() as f64);
                log::info!(
                    "snapshot {}x{} ({size}) -> {path:?}",
                    snapshot.width(),
                    snapshot.height()
                );
                context.written += 1;
                context.snapshots.push(path);
            }
            // Analysis is best-effort, drawing goes on.
            Err(e) => log::error!("failed to write snapshot {path:?}: {e}"),
        }
    }
    fn on_cleared(&mut self) {
        let mut context = self.context.lock();
        log::info!(
            "canvas cleared, dropping {} snapshots from context",
            context.snapshots.len()
        );
        context.snapshots.clear();
        context.clears += 1;
    }
}

#[cfg(test)]
mod test {
    use super::FileSink;
    use aicanvas_core::{surface::Surface, DrawingObserver, Snapshot};

    #[test]
    fn writes_and_forgets() {
        let dir = std::env::temp_dir().join(format!("aicanvas-sink-{}", std::process::id()));
        let mut sink = FileSink::new(&dir).unwrap();
        let context = sink.context();
        let snapshot = Snapshot::capture(&Surface::new(4, 4, 1.0).unwrap()).unwrap();

        sink.on_snapshot(&snapshot);
        sink.on_snapshot(&snapshot);
        {
            let context = context.lock();
            assert_eq!(context.snapshots.len(), 2);
            assert!(context.snapshots[1].ends_with("snapshot-0001.png"));
            assert_eq!(std::fs::read(&context.snapshots[0]).unwrap(), snapshot.png());
        }

        sink.on_cleared();
        sink.on_snapshot(&snapshot);
        {
            let context = context.lock();
            assert_eq!(context.clears, 1);
            assert_eq!(context.written, 3);
            // Numbering continues, so nothing on disk is overwritten.
            assert_eq!(context.snapshots.len(), 1);
            assert!(context.snapshots[0].ends_with("snapshot-0002.png"));
        }
        let _ = std::fs::remove_dir_all(dir);
    }
}
