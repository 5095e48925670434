//! Tern - A lightweight console for querying RDF graph stores.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod query;
pub mod store;
