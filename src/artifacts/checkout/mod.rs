//! Switching the working tree between commits
//!
//! Checkout validates its target, short-circuits when the repository is
//! already there, and otherwise rebuilds the working tree wholesale from the
//! target commit's tree:
//!
//! - `reconstruction`: materializes a stored tree into a staging directory
//!   and swaps it into place, then refreshes the index to match

pub mod reconstruction;
