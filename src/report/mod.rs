//! Report module - summarizing build results

pub mod manifest;
pub mod summary;

pub use manifest::*;
pub use summary::*;
