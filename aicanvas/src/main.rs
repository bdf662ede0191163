#![warn(clippy::pedantic)]

pub mod config;
pub mod replay;
pub mod script;
pub mod sink;

use anyhow::Result as AnyResult;
use std::path::{Path, PathBuf};

/// Replay one script into a fresh canvas, writing its snapshots and final image under `output_dir/<script name>/`.
fn run_script(path: &Path, preferences: &config::Preferences) -> AnyResult<()> {
    use anyhow::Context;

    let string = std::fs::read_to_string(path)?;
    let script = script::Script::from_toml(&string)?;
    let steps = script.compile()?;

    let name = path
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("script path has no file name"))?;
    let output_dir = preferences.output_dir.join(name);
    let sink = sink::FileSink::new(&output_dir)
        .with_context(|| format!("creating output dir {output_dir:?}"))?;
    let context = sink.context();

    let mut canvas = aicanvas_core::Canvas::new(preferences.canvas_settings()?)?;
    canvas.set_observer(Some(Box::new(sink)));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let report = runtime.block_on(replay::replay(
        &mut canvas,
        script.layout,
        steps,
        &output_dir,
    ))?;

    let mut final_image = output_dir.join(name);
    final_image.set_extension("png");
    std::fs::write(&final_image, canvas.export()?.png())?;

    let context = context.lock();
    log::info!(
        "{path:?}: {} commands, {} snapshots ({} in context after {} clears), final image {final_image:?}",
        report.commands,
        report.snapshots,
        context.snapshots.len(),
        context.clears,
    );
    Ok(())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let (preferences, loaded) = config::Preferences::load();
    let missing = config::Preferences::path().is_some_and(|path| !path.exists());
    if !loaded && missing {
        // Leave a documented file behind for the user to edit. A broken one is left alone.
        if let Err(e) = preferences.save() {
            log::warn!("Failed to save preferences:\n{e:?}");
        }
    }

    let replay_succeeded = {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        // Args are a simple list of scripts to replay. Each gets its own canvas and runtime.
        let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
        if paths.is_empty() {
            log::info!("usage: {} [SCRIPT.toml]...", env!("CARGO_PKG_NAME"));
        }
        // Did we have at least one success? No paths is a success.
        let had_success: std::sync::atomic::AtomicBool = paths.is_empty().into();
        paths.into_par_iter().for_each(|path| {
            match run_script(&path, &preferences) {
                Err(e) => log::error!("failed to replay {path:?}: {e:#}"),
                Ok(()) => had_success.store(true, std::sync::atomic::Ordering::Relaxed),
            }
        });
        had_success.into_inner()
    };
    if !replay_succeeded {
        anyhow::bail!("every script failed to replay");
    }
    Ok(())
}
