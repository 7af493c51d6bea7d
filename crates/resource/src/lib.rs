//! Resource providers for the acrofill fill engine.
//!
//! - [`DirectoryFontProvider`]: fonts found in configured resource directories
//!
//! The in-memory provider from `acrofill-traits` is re-exported for callers
//! that register fonts programmatically.

mod directory;

pub use directory::DirectoryFontProvider;

pub use acrofill_traits::InMemoryFontProvider;
