//! Core library for the `barrage` CLI.
//!
//! `barrage` sends a fixed number of HTTP GET requests to one URL through a
//! fixed number of concurrent workers and reports how they went. The
//! load-generation core lives in [`engine`]: a shared work queue hands out
//! one request at a time, every outcome lands in a [`metrics::ResultTally`],
//! and the run ends in a single [`report::Report`]. Everything else (CLI
//! parsing, config files, rendering) feeds that core or consumes its result.
pub mod adapters;
pub mod args;
pub mod config;
pub mod domain;
pub mod engine;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod report;
pub mod shutdown;
pub mod shutdown_handlers;
