//! Core library for the `volley` CLI.
//!
//! `volley` fires a fixed number of HTTP requests through a bounded pool of
//! workers. URLs and bodies are templates whose `{{$name}}` placeholders are
//! rendered per request, and results are aggregated into throughput, status
//! code and nearest-rank latency percentiles. The binary is a thin wrapper
//! around [`run`].
mod app;
pub mod args;
pub mod config;
mod entry;
pub mod error;
pub mod http;
mod logger;
pub mod metrics;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod template;

pub use entry::run;
