use std::net::Ipv4Addr;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;

use crate::error::TemplateError;

use super::entropy::Entropy;
use super::params::{no_params, pad_width, parse_int_params};

const UUID: &str = "$uuid";
const RANDOM_INT: &str = "$randomInt";
const RANDOM_FLOAT: &str = "$randomFloat";
const TIMESTAMP: &str = "$timestamp";
const TIMESTAMP_ISO: &str = "$timestampISO";
const RANDOM_STRING: &str = "$randomString";
const RANDOM_EMAIL: &str = "$randomEmail";
const RANDOM_NAME: &str = "$randomName";
const SEQUENCE: &str = "$sequence";
const CYCLE: &str = "$cycle";
const RANDOM_BOOL: &str = "$randomBool";
const RANDOM_IP: &str = "$randomIP";
const RANDOM_UA: &str = "$randomUA";

const EMAIL_PREFIX_LEN: usize = 8;
const EMAIL_DOMAINS: [&str; 4] = ["example.com", "test.com", "demo.org", "mail.example.com"];

const FIRST_NAMES: [&str; 26] = [
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Iris", "Jack", "Kate",
    "Leo", "Mia", "Noah", "Olivia", "Paul", "Quinn", "Ruby", "Sam", "Tina", "Uma", "Victor",
    "Wendy", "Xander", "Yara", "Zach",
];

const USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
];

/// A placeholder generator with its parameters already validated.
///
/// Built once when a template is parsed; [`Generator::generate`] cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
    Uuid,
    RandomInt { min: i64, max: i64 },
    RandomFloat,
    Timestamp,
    TimestampIso,
    RandomString { len: usize },
    RandomEmail,
    RandomName,
    Sequence { start: i64, pad: usize },
    Cycle { start: i64, count: u64, pad: usize },
    RandomBool,
    RandomIp,
    RandomUserAgent,
}

impl Generator {
    /// Resolve a placeholder base name and its raw parameter list.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names, parameters on parameterless
    /// placeholders, malformed or excess parameters, and out-of-range values.
    pub fn lookup(name: &str, params: &str) -> Result<Self, TemplateError> {
        match name {
            UUID => no_params(UUID, params).map(|()| Generator::Uuid),
            RANDOM_INT => {
                let [min, max] = parse_int_params(RANDOM_INT, params, [0, 10_000])?;
                if min > max {
                    return Err(TemplateError::InvalidRange {
                        name: RANDOM_INT,
                        min,
                        max,
                    });
                }
                Ok(Generator::RandomInt { min, max })
            }
            RANDOM_FLOAT => no_params(RANDOM_FLOAT, params).map(|()| Generator::RandomFloat),
            TIMESTAMP => no_params(TIMESTAMP, params).map(|()| Generator::Timestamp),
            TIMESTAMP_ISO => no_params(TIMESTAMP_ISO, params).map(|()| Generator::TimestampIso),
            RANDOM_STRING => {
                let [len] = parse_int_params(RANDOM_STRING, params, [16])?;
                let len = usize::try_from(len)
                    .ok()
                    .filter(|len| *len > 0)
                    .ok_or(TemplateError::NotPositive {
                        name: RANDOM_STRING,
                        field: "length",
                        value: len,
                    })?;
                Ok(Generator::RandomString { len })
            }
            RANDOM_EMAIL => no_params(RANDOM_EMAIL, params).map(|()| Generator::RandomEmail),
            RANDOM_NAME => no_params(RANDOM_NAME, params).map(|()| Generator::RandomName),
            SEQUENCE => {
                let [start, pad] = parse_int_params(SEQUENCE, params, [0, 0])?;
                let pad = pad_width(SEQUENCE, pad)?;
                Ok(Generator::Sequence { start, pad })
            }
            CYCLE => {
                let [start, count, pad] = parse_int_params(CYCLE, params, [1, 10, 0])?;
                let count = u64::try_from(count)
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or(TemplateError::NotPositive {
                        name: CYCLE,
                        field: "count",
                        value: count,
                    })?;
                let pad = pad_width(CYCLE, pad)?;
                Ok(Generator::Cycle { start, count, pad })
            }
            RANDOM_BOOL => no_params(RANDOM_BOOL, params).map(|()| Generator::RandomBool),
            RANDOM_IP => no_params(RANDOM_IP, params).map(|()| Generator::RandomIp),
            RANDOM_UA => no_params(RANDOM_UA, params).map(|()| Generator::RandomUserAgent),
            unknown => Err(TemplateError::UnknownPlaceholder {
                name: unknown.to_owned(),
            }),
        }
    }

    /// Placeholder name as written in templates, e.g. `$sequence`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Generator::Uuid => UUID,
            Generator::RandomInt { .. } => RANDOM_INT,
            Generator::RandomFloat => RANDOM_FLOAT,
            Generator::Timestamp => TIMESTAMP,
            Generator::TimestampIso => TIMESTAMP_ISO,
            Generator::RandomString { .. } => RANDOM_STRING,
            Generator::RandomEmail => RANDOM_EMAIL,
            Generator::RandomName => RANDOM_NAME,
            Generator::Sequence { .. } => SEQUENCE,
            Generator::Cycle { .. } => CYCLE,
            Generator::RandomBool => RANDOM_BOOL,
            Generator::RandomIp => RANDOM_IP,
            Generator::RandomUserAgent => RANDOM_UA,
        }
    }

    /// Produce the value for one request index.
    pub fn generate(&self, index: u64, entropy: &Entropy) -> String {
        match *self {
            Generator::Uuid => entropy.with_rng(|rng| format_uuid_v4(rng.r#gen())),
            Generator::RandomInt { min, max } => {
                entropy.with_rng(|rng| rng.gen_range(min..=max)).to_string()
            }
            Generator::RandomFloat => {
                let value: f64 = entropy.with_rng(|rng| rng.r#gen());
                format!("{:.6}", value)
            }
            Generator::Timestamp => Utc::now().timestamp().to_string(),
            Generator::TimestampIso => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Generator::RandomString { len } => entropy.with_rng(|rng| alphanumeric(rng, len)),
            Generator::RandomEmail => entropy.with_rng(|rng| {
                let prefix = alphanumeric(rng, EMAIL_PREFIX_LEN);
                format!("user_{}@{}", prefix, pick(rng, &EMAIL_DOMAINS))
            }),
            Generator::RandomName => entropy.with_rng(|rng| pick(rng, &FIRST_NAMES)).to_owned(),
            Generator::Sequence { start, pad } => {
                let value = i128::from(start).saturating_add(i128::from(index));
                zero_pad(value, pad)
            }
            Generator::Cycle { start, count, pad } => {
                let offset = index.checked_rem(count).unwrap_or(0);
                let value = i128::from(start).saturating_add(i128::from(offset));
                zero_pad(value, pad)
            }
            Generator::RandomBool => {
                let value: bool = entropy.with_rng(|rng| rng.r#gen());
                value.to_string()
            }
            Generator::RandomIp => entropy
                .with_rng(|rng| {
                    Ipv4Addr::new(
                        rng.gen_range(1..=254),
                        rng.r#gen(),
                        rng.r#gen(),
                        rng.gen_range(1..=254),
                    )
                })
                .to_string(),
            Generator::RandomUserAgent => {
                entropy.with_rng(|rng| pick(rng, &USER_AGENTS)).to_owned()
            }
        }
    }
}


/// Left-pad with zeros to `width` characters, sign included. Widths beyond
/// what `format!` accepts are padded by hand.
fn zero_pad(value: i128, width: usize) -> String {
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    let fill = width.saturating_sub(digits.len().saturating_add(sign.len()));
    let mut out = String::with_capacity(sign.len() + fill + digits.len());
    out.push_str(sign);
    out.extend(std::iter::repeat_n('0', fill));
    out.push_str(&digits);
    out
}

fn alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Render 128 random bits as an RFC 4122 version-4 UUID.
pub(super) fn format_uuid_v4(raw: u128) -> String {
    let value = (raw & !(0xF_u128 << 76)) | (0x4_u128 << 76);
    let value = (value & !(0x3_u128 << 62)) | (0x2_u128 << 62);
    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        value >> 96,
        (value >> 80) & 0xFFFF,
        (value >> 64) & 0xFFFF,
        (value >> 48) & 0xFFFF,
        value & 0xFFFF_FFFF_FFFF
    )
}
