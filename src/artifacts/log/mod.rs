//! Commit history traversal for `vit log`
//!
//! - `rev_list`: walks the parent chain from a starting revision, newest
//!   first
//!
//! Every commit stores at most one parent, so the walk is a straight line
//! ending at the root commit and needs no queueing or deduplication.

pub mod rev_list;
