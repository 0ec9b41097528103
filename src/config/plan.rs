use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::args::parsers::ensure_concurrency;
use crate::args::{HttpMethod, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::template::{Entropy, Template};

const TOKEN_OPEN: &str = "{{";
const TOKEN_CLOSE: &str = "}}";
const TOKEN_STAND_IN: &str = "0";

/// Validated run configuration with pre-parsed templates.
///
/// Everything downstream trusts these values; nothing is re-validated once a
/// plan exists.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub url: Template,
    pub method: HttpMethod,
    pub num_requests: u64,
    pub concurrency: usize,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub body: Template,
}

impl LoadPlan {
    /// Validate CLI arguments and parse the URL and body templates with a
    /// fresh OS-seeded [`Entropy`].
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing or malformed, a numeric
    /// option is out of range, or a template fails to parse.
    pub fn from_args(args: &TesterArgs) -> AppResult<Self> {
        Self::from_args_with_entropy(args, &Arc::new(Entropy::from_os()))
    }

    /// Like [`LoadPlan::from_args`] with a caller-provided randomness source.
    ///
    /// # Errors
    ///
    /// See [`LoadPlan::from_args`].
    pub fn from_args_with_entropy(args: &TesterArgs, entropy: &Arc<Entropy>) -> AppResult<Self> {
        let raw_url = args
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingUrl)?;
        validate_url(raw_url)?;
        let concurrency = ensure_concurrency(args.concurrency)?;

        let url = Template::parse(raw_url, entropy).map_err(|err| {
            AppError::config(ConfigError::InvalidTemplate {
                field: "URL",
                source: err,
            })
        })?;
        let body = Template::parse(&args.body, entropy).map_err(|err| {
            AppError::config(ConfigError::InvalidTemplate {
                field: "body",
                source: err,
            })
        })?;

        let plan = Self {
            url,
            method: args.method,
            num_requests: args.requests.get(),
            concurrency,
            timeout: args.timeout,
            headers: merge_headers(&args.headers),
            body,
        };
        tracing::debug!(
            "Load plan: {} {} x{} with {} workers, timeout {:?}",
            plan.method,
            plan.url.as_str(),
            plan.num_requests,
            plan.concurrency,
            plan.timeout
        );
        Ok(plan)
    }

    /// Whether a body is rendered and sent for each request.
    #[must_use]
    pub fn sends_body(&self) -> bool {
        self.method.sends_body() && !self.body.is_empty()
    }
}

/// Check the URL shape with every `{{...}}` token replaced by a stand-in
/// value, so templated hosts and paths still validate.
fn validate_url(raw: &str) -> Result<(), ValidationError> {
    let concrete = replace_tokens(raw, TOKEN_STAND_IN);
    let parsed = Url::parse(&concrete).map_err(|err| ValidationError::InvalidUrl {
        url: raw.to_owned(),
        source: err,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::UnsupportedScheme {
            scheme: scheme.to_owned(),
        }),
    }
}

fn replace_tokens(raw: &str, replacement: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find(TOKEN_OPEN) {
        let (before, from_open) = rest.split_at(open);
        let after_open = from_open.strip_prefix(TOKEN_OPEN).unwrap_or(from_open);
        let Some(close) = after_open.find(TOKEN_CLOSE) else {
            break;
        };
        output.push_str(before);
        output.push_str(replacement);
        let (_, from_close) = after_open.split_at(close);
        rest = from_close.strip_prefix(TOKEN_CLOSE).unwrap_or(from_close);
    }
    output.push_str(rest);
    output
}

/// Collapse repeated header names (ASCII case-insensitive); the last value
/// wins and keeps the first occurrence's position.
fn merge_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(headers.len());
    for (key, value) in headers {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
        {
            Some(slot) => slot.1.clone_from(value),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}

