//! COURTSIDE: live NBA data aggregator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod upstream;
pub mod resolver;
pub mod adapters;
pub mod pipeline;
pub mod feeds;
pub mod api;
