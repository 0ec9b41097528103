mod app;
mod config;
mod http;
mod run;
mod template;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::{HttpError, RequestError};
pub use run::RunError;
pub use template::TemplateError;
pub use validation::ValidationError;
