//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::TesterArgs;
pub use types::{HttpMethod, PositiveU64};

pub(crate) use parsers::parse_header;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const MIN_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 100;
