//! Patch synchronization engine for a Toontown Rewritten install: brings
//! a local directory tree to parity with the remote patch manifest,
//! verified by content hash. Account handling, process launching and all
//! presentation live in the embedding launcher, which only supplies an
//! install location plus platform identifier and consumes progress events.

//Modules
mod functions;
mod structures;
mod traits;
pub mod patcher;
pub mod patcher_builder;


pub use crate::patcher::Patcher;
pub use crate::patcher_builder::{detect_platform, PatcherBuilder, PATCH_DOWNLOAD_URL, PATCH_MANIFEST_URL};
pub use crate::structures::{
  Error, Event, PatchEntry, PatchManifest, PlanItem, PlanReason, Progress, ProgressCallback,
  SyncResult,
};
