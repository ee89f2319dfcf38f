//! apiprobe CLI
//!
//! Command-line interface for exercising the search-index and
//! movie-management REST APIs by hand.

pub mod client;
pub mod commands;
pub mod output;
