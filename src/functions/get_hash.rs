use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

use sha1::{Digest, Sha1};

/// Opens a file and calculates its SHA-1 hash, streaming in fixed-size
/// chunks so memory use stays bounded for large game assets. The digest
/// scheme is an external contract with the manifest server.
pub(crate) fn get_hash(file_path: &Path) -> Result<String, std::io::Error> {
  let mut file = OpenOptions::new().read(true).open(file_path)?;
  let mut hasher = Sha1::new();
  let mut buffer = [0u8; 8192];
  loop {
    let read = file.read(&mut buffer)?;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
  }
  Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use super::get_hash;

  #[test]
  fn hashes_known_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    std::fs::write(&path, b"hello world").unwrap();
    let hash = get_hash(&path).unwrap();
    assert_eq!(hash, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
  }

  #[test]
  fn hashes_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    std::fs::write(&path, b"").unwrap();
    let hash = get_hash(&path).unwrap();
    assert_eq!(hash, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
  }

  #[test]
  fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(get_hash(&dir.path().join("nope")).is_err());
  }
}
