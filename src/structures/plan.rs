use crate::structures::PatchEntry;

/// Why a file ended up in the download plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanReason {
  /// The file does not exist in the install directory.
  Missing,
  /// The file exists but its hash differs from the manifest.
  Stale,
}

/// One file that has to be downloaded and installed during this run.
#[derive(Debug, Clone)]
pub struct PlanItem {
  pub entry: PatchEntry,
  pub reason: PlanReason,
}
