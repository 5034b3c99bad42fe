//! Local record store (injected key-value backend).

pub mod activity;
pub mod kv;

pub use activity::ActivityStore;
pub use kv::{FileKv, KeyValueStore, MemoryKv};

/// Namespaced store keys as constants.
pub mod keys {
    /// The ordered activity record collection.
    pub const ACTIVITIES: &str = "pt_activities_v1";
}
