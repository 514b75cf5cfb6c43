//! Core abstractions for diagram processing
//!
//! The diagram model, the traits each pipeline stage implements, and the
//! shared utilities (errors, logging, text measurement, link coloring).

pub mod chumsky_utils;
mod database;
mod detector;
mod error;
mod layout;
pub mod link_colors;
pub mod logging;
mod parser;
mod text;
mod types;

pub use database::*;
pub use detector::*;
pub use error::*;
pub use layout::*;
pub use link_colors::*;
pub use logging::*;
pub use parser::*;
pub use text::*;
pub use types::*;
