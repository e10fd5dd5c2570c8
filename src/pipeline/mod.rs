//! Pipeline module - loading, cleaning and feature construction

pub mod calendar;
pub mod encoding;
pub mod error;
pub mod features;
pub mod loader;
pub mod missing;

pub use calendar::*;
pub use encoding::*;
pub use error::FeatureError;
pub use features::*;
pub use loader::*;
pub use missing::*;
