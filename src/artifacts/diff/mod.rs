//! Line-level content diffing
//!
//! - `lcs`: longest-common-subsequence edit script between two line
//!   sequences, rendered with ` `/`-`/`+` prefixes
//!
//! The diff driver compares each staged entry's blob against the working
//! file with the same path; only content is diffed, there is no rename or
//! mode detection.

pub mod lcs;
