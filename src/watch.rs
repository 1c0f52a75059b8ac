//! Doc tree watcher: runs the pass on startup, then again whenever the
//! generator rewrites the tree.
//!
//! The pass's own writes also raise events. The run they trigger finds
//! every page already linked and writes nothing, so the loop settles.

use std::path::Path;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, OutputFormat};
use crate::config::{ConfigOverrides, LinkConfig};
use crate::error;

/// Debounce delay between filesystem events and the next pass.
const DEBOUNCE_MS: u64 = 200;

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Config is loaded once; editing `.srclink.toml` needs a restart.
///
/// # Errors
///
/// Returns errors from config loading, the initial pass, or watcher setup.
/// Failures of later passes are printed and watching continues.
pub fn run(doc_root: &Path, overrides: &ConfigOverrides, format: OutputFormat) -> Result<(), error::Error> {
    let config = LinkConfig::load(Path::new("."), overrides)?;

    eprintln!("watch: initial pass");
    let summary = commands::run(doc_root, &config, false)?;
    commands::print_summary(&summary, format)?;

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(doc_root, RecursiveMode::Recursive)
        .map_err(|e| {
            return error::Error::Watch {
                reason: format!("cannot watch {}: {e}", doc_root.display()),
            };
        })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", doc_root.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        tracing::debug!("change detected");
        rerun(doc_root, &config, format);
    }

    return Ok(());
}

/// Run one pass after a change, reporting only when something was linked.
fn rerun(doc_root: &Path, config: &LinkConfig, format: OutputFormat) {
    match commands::run(doc_root, config, false) {
        Ok(summary) if summary.changed.is_empty() => {},
        Ok(summary) => {
            if let Err(e) = commands::print_summary(&summary, format) {
                eprintln!("error: {e}");
            }
        },
        Err(e) => eprintln!("error: {e}"),
    }
}
