//! Working tree status inspection
//!
//! Reconciles three snapshots of the same file set: the HEAD commit's tree,
//! the index, and the working tree.
//!
//! ## Components
//!
//! - `file_change`: change categories per area and their rendering
//! - `inspector`: per-entry comparison logic
//! - `status_info`: one status run's aggregated results

pub mod file_change;
pub mod inspector;
pub mod status_info;
