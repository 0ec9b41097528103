//! Configuration loading, CLI merging, and the validated [`LoadPlan`].
mod apply;
mod loader;
mod plan;
pub mod types;


pub use apply::apply_config;
pub use loader::load_config;
pub use plan::LoadPlan;

#[cfg(test)]
pub(crate) use loader::load_config_file;

/// Config files looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["volley.toml", "volley.json"];
