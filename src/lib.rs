//! A minimal content-addressable version control engine.
//!
//! The crate is split into three layers:
//!
//! - `areas`: the on-disk surfaces of a repository (object database, index,
//!   refs, logs, workspace)
//! - `artifacts`: the data structures and algorithms those areas exchange
//! - `commands`: porcelain and plumbing entry points composed on top of both

pub mod areas;
pub mod artifacts;
pub mod commands;
