use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::patcher::Patcher;
use crate::structures::{Error, Progress, ProgressCallback};

/// Default manifest location. The URL ends in ".txt" yet serves JSON;
/// that is the server's contract and is preserved as-is.
pub const PATCH_MANIFEST_URL: &str = "https://cdn.toontownrewritten.com/content/patchmanifest.txt";

/// Root URL the compressed download objects hang off of.
pub const PATCH_DOWNLOAD_URL: &str = "https://download.toontownrewritten.com/patches/";

/// Maps the host OS and architecture onto the platform identifiers used
/// by the manifest's "only" arrays. Returns `None` on hosts the manifest
/// has no identifier for; synchronization cannot run without one.
pub fn detect_platform() -> Option<&'static str> {
  if cfg!(all(target_os = "windows", target_pointer_width = "64")) {
    Some("win64")
  } else if cfg!(target_os = "windows") {
    Some("win32")
  } else if cfg!(target_os = "macos") {
    Some("darwin")
  } else if cfg!(target_os = "linux") {
    Some("linux")
  } else {
    None
  }
}

pub struct PatcherBuilder {
  install_location: Option<PathBuf>,
  manifest_url: String,
  download_url: String,
  platform: Option<String>,
  concurrency: usize,
  progress_callback: Option<ProgressCallback>,
}

impl PatcherBuilder {
  pub fn new() -> Self {
    Self {
      install_location: None,
      manifest_url: PATCH_MANIFEST_URL.to_string(),
      download_url: PATCH_DOWNLOAD_URL.to_string(),
      platform: detect_platform().map(str::to_string),
      concurrency: 1,
      progress_callback: None,
    }
  }

  /// The directory the game is installed in. Required.
  pub fn set_install_location(mut self, install_location: impl Into<PathBuf>) -> Self {
    self.install_location = Some(install_location.into());
    self
  }

  pub fn set_manifest_url(mut self, manifest_url: impl Into<String>) -> Self {
    self.manifest_url = manifest_url.into();
    self
  }

  pub fn set_download_url(mut self, download_url: impl Into<String>) -> Self {
    self.download_url = download_url.into();
    self
  }

  /// Overrides the detected platform identifier.
  pub fn set_platform(mut self, platform: impl Into<String>) -> Self {
    self.platform = Some(platform.into());
    self
  }

  /// How many plan items are downloaded and installed in parallel. The
  /// default of 1 reproduces the strictly sequential behavior.
  pub fn set_concurrency(mut self, concurrency: usize) -> Self {
    self.concurrency = concurrency;
    self
  }

  pub fn set_progress_callback(mut self, callback: ProgressCallback) -> Self {
    self.progress_callback = Some(callback);
    self
  }

  pub fn build(self) -> Result<Patcher, Error> {
    let install_location = self
      .install_location
      .ok_or(Error::MissingParameter("install_location"))?;
    let platform = self.platform.ok_or(Error::UnknownPlatform())?;
    let manifest_url = Url::parse(&self.manifest_url)?;
    // A trailing slash so joining an object name lands under this root.
    let download_url = if self.download_url.ends_with('/') {
      Url::parse(&self.download_url)?
    } else {
      Url::parse(&format!("{}/", self.download_url))?
    };

    Ok(Patcher {
      install_location,
      manifest_url,
      download_url,
      platform,
      concurrency: self.concurrency.max(1),
      callback: self.progress_callback.unwrap_or_else(|| Arc::new(|_| {})),
      progress: Progress::new(),
      in_progress: Arc::new(AtomicBool::new(false)),
      cancel: CancellationToken::new(),
    })
  }
}

impl Default for PatcherBuilder {
  fn default() -> Self {
    Self::new()
  }
}
