//! Search engine implementations.
//!
//! Each module provides a struct implementing [`crate::engine::SearchEngineTrait`]
//! that scrapes a specific search engine's HTML results page.

pub mod duckduckgo;
pub mod google;

pub use duckduckgo::DuckDuckGoEngine;
pub use google::GoogleEngine;
