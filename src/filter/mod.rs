//! DNS query filtering.
//!
//! Blocks queries whose names fall under a configured set of domain
//! suffixes; everything else is forwarded upstream untouched.

mod blocklist;

pub use blocklist::Blocklist;
