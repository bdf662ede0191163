//! # Replay
//!
//! Drives a [`Canvas`] from a compiled script on a tokio runtime. One task feeds commands through a channel with
//! their recorded delays, the other applies them and sleeps on the canvas's settle deadline in between, so a new
//! stroke arriving before the deadline simply wins the race and the pending snapshot is dropped.

use crate::script::{Command, Layout, Step};
use aicanvas_core::{input::Rect, Canvas};
use std::path::Path;

/// What happened during a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub commands: usize,
    pub snapshots: usize,
}

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

async fn feed(steps: Vec<Step>, send: tokio::sync::mpsc::Sender<Command>) -> anyhow::Result<()> {
    for step in steps {
        if !step.wait.is_zero() {
            tokio::time::sleep(step.wait).await;
        }
        // Receiver gone means the worker bailed, it'll report why.
        if send.send(step.command).await.is_err() {
            break;
        }
    }
    Ok(())
}

async fn work(
    canvas: &mut Canvas,
    layout: Layout,
    mut recv: tokio::sync::mpsc::Receiver<Command>,
    output_dir: &Path,
) -> anyhow::Result<Report> {
    let mut report = Report::default();
    loop {
        let deadline = canvas.next_deadline();
        tokio::select! {
            // A snapshot due at the same instant as an event is taken first.
            biased;
            () = sleep_until(deadline) => {
                if canvas.poll(now())?.is_some() {
                    report.snapshots += 1;
                }
            }
            command = recv.recv() => {
                let Some(command) = command else { break };
                apply(canvas, layout, command, output_dir)?;
                report.commands += 1;
            }
        }
    }
    // Input's over, let the last burst settle.
    if let Some(deadline) = canvas.next_deadline() {
        sleep_until(Some(deadline)).await;
        if canvas.poll(now())?.is_some() {
            report.snapshots += 1;
        }
    }
    Ok(report)
}

fn apply(
    canvas: &mut Canvas,
    layout: Layout,
    command: Command,
    output_dir: &Path,
) -> anyhow::Result<()> {
    // Read the element's box fresh each event, it changes with resizes.
    let bounds = {
        let settings = canvas.settings();
        Rect::new(
            layout.left,
            layout.top,
            settings.logical_width,
            settings.logical_height,
        )
    };
    match command {
        Command::Down(event) => {
            canvas.pointer_down(&event, &bounds);
        }
        Command::Move(event) => {
            canvas.pointer_move(&event, &bounds);
        }
        Command::Up => {
            canvas.pointer_up(now());
        }
        Command::Leave => {
            canvas.pointer_leave(now());
        }
        Command::Brush(action) => {
            let brush = canvas.dispatch(action);
            log::debug!("brush now {brush:?}");
        }
        Command::Template(shape) => {
            let placement = canvas.draw_template(shape, now());
            log::debug!("placed {placement:?}");
        }
        Command::Clear => canvas.clear(),
        Command::Resize {
            width,
            height,
            density,
        } => {
            let density = density.unwrap_or(canvas.surface().density());
            // A rejected size leaves the old surface in place, like a browser ignoring a bogus layout.
            if let Err(e) = canvas.resize(width, height, density) {
                log::warn!("ignoring resize to {width}x{height}@{density}: {e}");
            }
        }
        Command::Export(path) => {
            let path = output_dir.join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let snapshot = canvas.export()?;
            std::fs::write(&path, snapshot.png())?;
            log::info!("exported {snapshot:?} to {path:?}");
        }
    }
    Ok(())
}

/// Play `steps` into `canvas`, returning once every command is applied and any pending snapshot has been taken.
pub async fn replay(
    canvas: &mut Canvas,
    layout: Layout,
    steps: Vec<Step>,
    output_dir: &Path,
) -> anyhow::Result<Report> {
    let (send, recv) = tokio::sync::mpsc::channel(4);
    // Current-thread runtime, so these interleave rather than run in parallel.
    let ((), report) = tokio::try_join!(feed(steps, send), work(canvas, layout, recv, output_dir))?;
    Ok(report)
}
