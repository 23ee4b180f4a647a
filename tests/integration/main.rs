//! Integration test harness.
//!
//! Drives the public feed service and HTTP router against a deterministic
//! in-memory upstream.

mod fixture_upstream;
mod pipeline;
mod routes;
