//! Pure text-pattern parsers used by the normalize and summarize stages.
//!
//! Each parser takes a string and returns an optional structured match, so
//! every pattern can be exercised on its own.

pub mod labels;
pub mod listing;

pub use labels::*;
pub use listing::*;
