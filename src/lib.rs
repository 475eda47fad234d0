//! lowview library
//!
//! Pages through YouTube search results, looks up view counts and keeps the
//! videos at or under a view threshold.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod logging;
pub mod prompt;
pub mod report;
pub mod search;
