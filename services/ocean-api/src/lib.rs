//! Ocean API Service Library
//!
//! This crate provides the HTTP server for cached NOAA ERDDAP
//! oceanographic measurements.

pub mod config;
pub mod fetch;
pub mod handlers;
pub mod resolver;
pub mod state;
pub mod stats;
pub mod zones;
