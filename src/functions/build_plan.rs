use std::path::Path;

use tracing::info;

use crate::functions::get_hash;
use crate::structures::{Error, Event, PatchManifest, PlanItem, PlanReason, ProgressCallback};

/// Compares the manifest against the local tree for the given platform and
/// returns the files that have to be downloaded, in manifest order.
///
/// An unreadable local file aborts the whole run: an ambiguous file state
/// must never be silently skipped. Entries for other platforms are ignored
/// entirely, they are neither hashed nor downloaded.
pub(crate) fn build_plan(
  manifest: &PatchManifest,
  install_root: &Path,
  platform: &str,
  callback: &ProgressCallback,
) -> Result<Vec<PlanItem>, Error> {
  let mut plan = Vec::new();
  for entry in &manifest.entries {
    if !entry.applies_to(platform) {
      continue;
    }
    callback(Event::CheckingFile { path: &entry.path });

    let local_path = install_root.join(&entry.path);
    if !local_path.exists() {
      info!("{} is missing and will be downloaded", entry.path);
      plan.push(PlanItem { entry: entry.clone(), reason: PlanReason::Missing });
      continue;
    }

    let local_hash =
      get_hash(&local_path).map_err(|error| Error::HashError(entry.path.clone(), error))?;
    info!("{}: local hash {}, expected hash {}", entry.path, local_hash, entry.hash);
    if local_hash.eq_ignore_ascii_case(&entry.hash) {
      info!("{} is up to date", entry.path);
    } else {
      info!("{} is outdated and will be downloaded", entry.path);
      plan.push(PlanItem { entry: entry.clone(), reason: PlanReason::Stale });
    }
  }
  Ok(plan)
}
