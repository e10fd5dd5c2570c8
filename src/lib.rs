//! Dayfeat: Calendar Feature Library
//!
//! A library for turning daily count series into modeling tables with
//! weekday, month and US federal holiday features.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
