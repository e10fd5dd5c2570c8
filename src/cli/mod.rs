//! CLI module - argument parsing

mod args;

pub use args::{Cli, DEFAULT_DATA_PATH, DEFAULT_OUTPUT_PATH};
