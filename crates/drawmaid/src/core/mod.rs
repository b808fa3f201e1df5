//! Core abstractions for diagram processing
//!
//! The traits every dialect implements, the shared data types, and the
//! infrastructure the dialects build on: source preprocessing, the
//! shape/arrow lexicon, and the draw.io and Markdown document builders.

pub mod chumsky_utils;
mod database;
mod detector;
mod diagram;
pub mod drawio;
mod error;
mod layout;
pub mod lexicon;
pub mod logging;
pub mod markdown;
mod parser;
mod renderer;
pub mod source;
mod types;

pub use database::*;
pub use detector::*;
pub use diagram::*;
pub use error::*;
pub use layout::*;
pub use logging::{init_default_logging, init_logging, LogFormat};
pub use parser::*;
pub use renderer::*;
pub use source::{Header, SourceLine};
pub use types::*;
