use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::functions::{build_plan, download_file, extract_file, fetch_manifest, get_hash};
use crate::patcher::Patcher;
use crate::structures::{Error, Event, PlanItem, SyncResult};

const MANIFEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Scratch directory for in-flight downloads and extractions. It lives
/// inside the install directory so the final rename never crosses a
/// filesystem boundary, and it is removed again at the end of every run.
const STAGING_DIR: &str = "patcher-staging";

/// One full synchronization run: fetch the manifest, diff it against the
/// local tree, then download, extract and install every planned file.
pub(crate) async fn flow(patcher: &Patcher) -> Result<SyncResult, Error> {
  if !patcher.install_location.exists() {
    return Err(Error::InstallRootMissing(patcher.install_location.clone()));
  }
  info!("checking for updates against {}", patcher.manifest_url);
  let manifest = fetch_manifest(&patcher.manifest_url, MANIFEST_TIMEOUT).await?;

  // Hashing the local tree is disk and CPU bound, keep it off the runtime.
  let plan = {
    let manifest = manifest.clone();
    let install_root = patcher.install_location.clone();
    let platform = patcher.platform.clone();
    let callback = patcher.callback.clone();
    tokio::task::spawn_blocking(move || build_plan(&manifest, &install_root, &platform, &callback))
      .await??
  };
  if plan.is_empty() {
    info!("all files are up to date");
    return Ok(SyncResult::UpToDate);
  }

  patcher.progress.set_files_total(plan.len() as u64);
  info!("{} file(s) are going to be downloaded", plan.len());

  let staging = patcher.install_location.join(STAGING_DIR);
  tokio::fs::create_dir_all(&staging).await?;

  // A failing item only aborts the run it belongs to. The run-scoped
  // token still observes `Patcher::cancel`, but tripping it leaves the
  // instance-level token untouched so a later run starts clean.
  let cancel = patcher.cancel.child_token();
  let outcome = run_plan(patcher, &staging, &cancel, plan).await;

  // Best effort: once the real work succeeded a leftover staging
  // directory never downgrades the run, but it is surfaced on its own.
  if let Err(error) = tokio::fs::remove_dir_all(&staging).await {
    warn!("unable to remove staging directory {}: {}", staging.display(), error);
    (patcher.callback)(Event::CleanupFailed { path: &staging, error: &error });
  }

  let files_updated = outcome?;
  Ok(SyncResult::Success { files_updated })
}

/// Drives the plan through a bounded worker pool. With a concurrency of 1
/// this degenerates to the strictly sequential download-then-extract loop.
async fn run_plan(
  patcher: &Patcher,
  staging: &Path,
  cancel: &CancellationToken,
  plan: Vec<PlanItem>,
) -> Result<u64, Error> {
  let mut results = futures::stream::iter(plan.into_iter().enumerate())
    .map(|(index, item)| process_item(patcher, staging.to_path_buf(), cancel, index, item))
    .buffer_unordered(patcher.concurrency);

  let mut first_error: Option<Error> = None;
  while let Some(result) = results.next().await {
    if let Err(current) = result {
      // First failure wins: cancel in-flight items, then drain them. Their
      // secondary `Cancelled` errors never mask the original failure.
      cancel.cancel();
      let replace = match &first_error {
        None => true,
        Some(Error::Cancelled()) => !matches!(current, Error::Cancelled()),
        Some(_) => false,
      };
      if replace {
        if !matches!(current, Error::Cancelled()) {
          error!("aborting run: {}", current);
        }
        first_error = Some(current);
      }
    }
  }
  match first_error {
    Some(error) => Err(error),
    None => Ok(patcher.progress.files_completed()),
  }
}

async fn process_item(
  patcher: &Patcher,
  staging: PathBuf,
  cancel: &CancellationToken,
  index: usize,
  item: PlanItem,
) -> Result<(), Error> {
  if cancel.is_cancelled() {
    return Err(Error::Cancelled());
  }

  // Staging names are namespaced by plan index so parallel items never collide.
  let staged = staging.join(format!("{}_{}", index, item.entry.download_name));
  download_file(
    &patcher.download_url,
    &item,
    &staged,
    patcher.callback.clone(),
    patcher.progress.clone(),
    cancel,
  )
  .await?;

  let extracted = staging.join(format!("{}_{}.extracted", index, item.entry.download_name));
  {
    let staged = staged.clone();
    let extracted = extracted.clone();
    let path = item.entry.path.clone();
    let expected = item.entry.hash.clone();
    let callback = patcher.callback.clone();
    let cancel = cancel.clone();
    tokio::task::spawn_blocking(move || {
      extract_file(&staged, &extracted, &path, &callback, &cancel)?;
      // Only a fully verified file may be renamed into the install root.
      let computed = get_hash(&extracted)?;
      if !computed.eq_ignore_ascii_case(&expected) {
        return Err(Error::HashMismatch(path, computed, expected));
      }
      Ok::<(), Error>(())
    })
    .await??;
  }

  let target = patcher.install_location.join(&item.entry.path);
  if let Some(parent) = target.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::rename(&extracted, &target).await?;
  patcher.progress.increment_files_completed();
  info!("installed {}", item.entry.path);
  Ok(())
}
