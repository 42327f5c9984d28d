pub mod extraction;
pub mod quiet_hours;
pub mod types;

pub use extraction::{Extraction, MissingContent};
pub use quiet_hours::QuietHours;
pub use types::{Outcome, SnapshotRecord};
