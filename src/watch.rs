//! File watcher: runs `build` on startup, then rebuilds on changes under the docs directory.

use std::path::Path;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use wikibridge::config::Config;
use wikibridge::error::Error;

use crate::commands;

/// Debounce delay between filesystem events and the rebuild.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that signals on the given channel, ignoring
/// events that only touch the output directory.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    out: std::path::PathBuf,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
            )
            && event.paths.iter().any(|p| return !p.starts_with(&out))
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Every rebuild starts from a fresh walk and a fresh index.
///
/// # Errors
///
/// Returns errors from config loading or watcher setup. Failed rebuilds are
/// printed and watching continues.
pub fn run(root: &Path, out: &Path) -> Result<(), Error> {
    let config = Config::load(root)?;
    let docs_dir = root.join(&config.docs_dir);
    let out = std::path::absolute(out)?;

    eprintln!("watch: initial build");
    run_build(root, &out);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, out.clone())?;
    watcher.watch(&docs_dir, RecursiveMode::Recursive).map_err(|e| {
        return Error::Watch {
            reason: format!("cannot watch {}: {e}", docs_dir.display()),
        };
    })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", docs_dir.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, rebuilding...");
        run_build(root, &out);
    }

    return Ok(());
}

/// Run build once, printing any error instead of stopping the watch.
fn run_build(root: &Path, out: &Path) {
    if let Err(e) = commands::build(root, out) {
        crate::diagnostics::print_error(&e);
    }
}
