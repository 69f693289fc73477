use crate::structures::Error;

/// Terminal value of a synchronization run, produced exactly once.
#[derive(Debug)]
pub enum SyncResult {
  /// Every applicable file already matched the manifest.
  UpToDate,
  /// All planned files were downloaded, extracted and installed.
  Success { files_updated: u64 },
  /// The run aborted at the first fatal error.
  Failed(Error),
}

impl SyncResult {
  pub fn is_failed(&self) -> bool {
    matches!(self, Self::Failed(_))
  }
}
