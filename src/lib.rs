//! Climinha - temperature sensor dashboard
//!
//! Polls a sensor backend for its reading history, keeps it in a single
//! dashboard state task, and serves the windowed chart view over HTTP.
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod routes;
pub mod sensor;
pub mod sync;
pub mod view;
