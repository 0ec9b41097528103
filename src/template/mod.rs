//! Per-request template rendering for URLs and bodies.
//!
//! Templates are parsed once at configuration time. Placeholders use the
//! `{{$name}}` or `{{$name(p1,p2)}}` syntax; every generator is validated
//! during [`Template::parse`] so [`Template::render`] cannot fail.
mod entropy;
mod generator;
mod params;


use std::borrow::Cow;
use std::sync::Arc;

use crate::error::TemplateError;

pub use entropy::Entropy;
pub use generator::Generator;
use params::split_placeholder;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Dynamic(Generator),
}

#[derive(Debug, Clone)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
    placeholders: Vec<&'static str>,
    entropy: Arc<Entropy>,
}

impl Template {
    /// Parse a raw string into static and generator segments.
    ///
    /// Text outside `{{ ... }}` is kept verbatim, including an unmatched
    /// trailing `{{`.
    ///
    /// # Errors
    ///
    /// Returns an error when a placeholder is unknown or its parameters are
    /// malformed or out of range.
    pub fn parse(raw: &str, entropy: &Arc<Entropy>) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut placeholders: Vec<&'static str> = Vec::new();
        let mut rest = raw;

        loop {
            let Some(open) = rest.find(OPEN) else {
                if !rest.is_empty() {
                    segments.push(Segment::Static(rest.to_owned()));
                }
                break;
            };
            let (before, from_open) = rest.split_at(open);
            let after_open = from_open.strip_prefix(OPEN).unwrap_or(from_open);
            let Some(close) = after_open.find(CLOSE) else {
                segments.push(Segment::Static(rest.to_owned()));
                break;
            };

            if !before.is_empty() {
                segments.push(Segment::Static(before.to_owned()));
            }

            let (token, from_close) = after_open.split_at(close);
            let (base, params) = split_placeholder(token.trim())?;
            let generator = Generator::lookup(base, params)?;
            let name = generator.name();
            if !placeholders.contains(&name) {
                placeholders.push(name);
            }
            segments.push(Segment::Dynamic(generator));

            rest = from_close.strip_prefix(CLOSE).unwrap_or(from_close);
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
            placeholders,
            entropy: Arc::clone(entropy),
        })
    }

    /// Render the template for one request index.
    ///
    /// Templates without placeholders borrow the original string.
    #[must_use]
    pub fn render(&self, index: u64) -> Cow<'_, str> {
        if !self.has_placeholders() {
            return Cow::Borrowed(&self.raw);
        }

        let mut output = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => output.push_str(text),
                Segment::Dynamic(generator) => {
                    output.push_str(&generator.generate(index, &self.entropy));
                }
            }
        }
        Cow::Owned(output)
    }

    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// Unique placeholder names in first-seen order.
    #[must_use]
    pub fn placeholders(&self) -> &[&'static str] {
        &self.placeholders
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
