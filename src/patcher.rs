use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use url::Url;

use crate::functions::flow;
use crate::structures::{Error, Event, Progress, ProgressCallback, SyncResult};

/// The synchronization engine. Built through [`crate::PatcherBuilder`],
/// it reconciles the install directory against the remote manifest and
/// reports progress through the configured event callback.
pub struct Patcher {
  pub(crate) install_location: PathBuf,
  pub(crate) manifest_url: Url,
  pub(crate) download_url: Url,
  pub(crate) platform: String,
  pub(crate) concurrency: usize,
  pub(crate) callback: ProgressCallback,
  pub(crate) progress: Progress,
  pub(crate) in_progress: Arc<AtomicBool>,
  pub(crate) cancel: CancellationToken,
}

impl Patcher {
  /// Runs one full synchronization and returns the terminal result, which
  /// is also emitted exactly once as [`Event::RunFinished`]. A second
  /// `run` while one is active is rejected rather than interleaved; both
  /// would race on the staging directory.
  pub async fn run(&self) -> SyncResult {
    if self.cancel.is_cancelled() {
      return self.finish(SyncResult::Failed(Error::Cancelled()));
    }
    if self.in_progress.swap(true, Ordering::SeqCst) {
      return self.finish(SyncResult::Failed(Error::InProgress()));
    }
    self.progress.reset();

    let result = match flow(self).await {
      Ok(result) => result,
      Err(error) => SyncResult::Failed(error),
    };
    self.in_progress.store(false, Ordering::SeqCst);
    self.finish(result)
  }

  fn finish(&self, result: SyncResult) -> SyncResult {
    match &result {
      SyncResult::UpToDate => info!("finished checking for updates, everything is up to date"),
      SyncResult::Success { files_updated } => {
        info!("finished updating, {} file(s) installed", files_updated)
      }
      SyncResult::Failed(error) => error!("update run failed: {}", error),
    }
    (self.callback)(Event::RunFinished(&result));
    result
  }

  /// Aborts the active run. In-flight transfers stop at their next chunk,
  /// queued plan items are skipped entirely. Cancellation is terminal for
  /// this instance; build a fresh `Patcher` to synchronize again.
  pub fn cancel(&self) {
    info!("cancelling the current run");
    self.cancel.cancel();
  }

  /// A handle onto the shared run counters, for UIs that poll instead of
  /// consuming events.
  pub fn progress(&self) -> Progress {
    self.progress.clone()
  }

  pub fn platform(&self) -> &str {
    &self.platform
  }
}
