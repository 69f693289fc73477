use std::path::Path;
use std::sync::Arc;

use crate::structures::SyncResult;

/// Discrete progress events emitted during a run. The embedding UI decides
/// how to render them; the engine itself owns no presentation state.
#[derive(Debug)]
pub enum Event<'a> {
  /// A manifest entry is being compared against the local file.
  CheckingFile { path: &'a str },
  /// Bytes written so far for a download, `total` is the reported
  /// content length where the server sent one.
  DownloadProgress { path: &'a str, bytes: u64, total: Option<u64> },
  /// Percentage of the staged file's compressed bytes consumed so far.
  ExtractProgress { path: &'a str, percent: u8 },
  /// The staging directory could not be removed after an otherwise
  /// finished run. Non-fatal, the run result is unaffected.
  CleanupFailed { path: &'a Path, error: &'a std::io::Error },
  /// Terminal event, emitted exactly once per run.
  RunFinished(&'a SyncResult),
}

pub type ProgressCallback = Arc<dyn Fn(Event<'_>) + Send + Sync>;
