pub mod error;
pub use error::Error;

pub mod manifest;
pub use manifest::{PatchEntry, PatchManifest};

pub mod plan;
pub use plan::{PlanItem, PlanReason};

pub mod event;
pub use event::{Event, ProgressCallback};

pub mod progress;
pub use progress::Progress;

pub mod sync_result;
pub use sync_result::SyncResult;
