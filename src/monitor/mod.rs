pub mod archive;
pub mod differ;
pub mod fingerprint;
pub mod normalize;
pub mod store;
pub mod watcher;

pub use archive::Archive;
pub use store::SnapshotStore;
pub use watcher::{Notifier, PageSource, Watcher};
