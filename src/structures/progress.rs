use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counters for the current run. Clones share the same counters, so
/// the embedding UI can poll a clone while the run updates the original.
#[derive(Debug, Clone, Default)]
pub struct Progress {
  files_total: Arc<AtomicU64>,
  files_completed: Arc<AtomicU64>,
  downloaded_bytes: Arc<AtomicU64>,
}

impl Progress {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn files_total(&self) -> u64 {
    self.files_total.load(Ordering::Relaxed)
  }

  pub fn files_completed(&self) -> u64 {
    self.files_completed.load(Ordering::Relaxed)
  }

  pub fn downloaded_bytes(&self) -> u64 {
    self.downloaded_bytes.load(Ordering::Relaxed)
  }

  pub(crate) fn reset(&self) {
    self.files_total.store(0, Ordering::Relaxed);
    self.files_completed.store(0, Ordering::Relaxed);
    self.downloaded_bytes.store(0, Ordering::Relaxed);
  }

  pub(crate) fn set_files_total(&self, value: u64) {
    self.files_total.store(value, Ordering::Relaxed);
  }

  pub(crate) fn increment_files_completed(&self) {
    self.files_completed.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn add_downloaded_bytes(&self, amount: u64) {
    self.downloaded_bytes.fetch_add(amount, Ordering::Relaxed);
  }

  pub(crate) fn remove_downloaded_bytes(&self, amount: u64) {
    self.downloaded_bytes.fetch_sub(amount, Ordering::Relaxed);
  }
}
