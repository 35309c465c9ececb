//! Scope Reaper: removes systemd scope state leaked by deleted Kubernetes pods.
//!
//! Container runtimes using the systemd cgroup driver create a transient
//! `run-*.scope` unit per mount. When a pod is deleted these units and their
//! drop-in directories below `/run/systemd/system` are sometimes left behind.
//! Every check interval a pass compares them against the pods still known to the
//! kubelet, removes the directories of pods that are gone and then stops the
//! units whose directory has disappeared.
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::time::MissedTickBehavior;

pub mod cleanup;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod matcher;
pub mod pod;
pub mod reconcile;
pub mod systemd;

pub use cleanup::{Cleaner, PassReport};
pub use config::Config;

/// Runs the reaper until a shutdown signal arrives.
///
/// The first pass starts immediately, later ones every `check_interval`. Passes
/// run on the blocking thread pool and the next tick is only awaited once the
/// previous pass has finished, so passes never overlap. A failed pass is logged
/// and retried on the next tick.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be installed, if a pass task
/// panics, or if `--once` was given and the single pass aborted.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "Starting scope-reaper check-interval={}",
        humantime::format_duration(config.check_interval)
    );
    let cleaner = Arc::new(Cleaner::new(
        config.layout(),
        systemd::Systemctl::new(&config.systemctl),
    ));
    log::debug!("Layout: {:?}", cleaner.layout());

    if config.once {
        let report = run_pass(Arc::clone(&cleaner)).await?;
        return match report.error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        };
    }

    let mut interval = tokio::time::interval(config.check_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut shutdown = std::pin::pin!(shutdown_signal()?);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => {
                log::info!("Received shutdown signal, exiting");
                return Ok(());
            }
        }

        run_pass(Arc::clone(&cleaner)).await?;
    }
}

async fn run_pass(
    cleaner: Arc<Cleaner<systemd::Systemctl>>,
) -> Result<PassReport, tokio::task::JoinError> {
    let before = std::time::Instant::now();
    let report = tokio::task::spawn_blocking(move || cleaner.run_pass()).await?;
    log::debug!("Cleanup pass took {} ms", before.elapsed().as_millis());
    Ok(report)
}

/// Resolves once SIGINT or SIGTERM is received.
fn shutdown_signal() -> std::io::Result<impl std::future::Future<Output = ()>> {
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
    })
}
