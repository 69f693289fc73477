/// One file declared by the remote patch manifest.
#[derive(Debug, Clone)]
pub struct PatchEntry {
  /// Path of the installed file, relative to the install directory.
  pub path: String,
  /// Lowercase-compared SHA-1 digest the installed file must have.
  pub hash: String,
  /// Name of the compressed object on the download server.
  pub download_name: String,
  /// Platform identifiers this file applies to.
  pub platforms: Vec<String>,
}

impl PatchEntry {
  pub fn applies_to(&self, platform: &str) -> bool {
    self.platforms.iter().any(|candidate| candidate == platform)
  }
}

/// The parsed patch manifest. Entries keep the order the server declared
/// them in, which also fixes the order of the download plan.
#[derive(Debug, Clone)]
pub struct PatchManifest {
  pub entries: Vec<PatchEntry>,
}

impl PatchManifest {
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
