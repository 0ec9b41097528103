use crate::error::TemplateError;

/// Split a token body such as `$sequence(1,3)` into `("$sequence", "1,3")`.
pub(super) fn split_placeholder(raw: &str) -> Result<(&str, &str), TemplateError> {
    let Some(open) = raw.find('(') else {
        return Ok((raw, ""));
    };
    let (base, tail) = raw.split_at(open);
    let params = tail
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .ok_or_else(|| TemplateError::UnbalancedParentheses {
            placeholder: raw.to_owned(),
        })?;
    Ok((base, params))
}

/// Parse up to `N` comma-separated integers; missing or blank entries keep
/// their default.
pub(super) fn parse_int_params<const N: usize>(
    name: &'static str,
    raw: &str,
    defaults: [i64; N],
) -> Result<[i64; N], TemplateError> {
    let mut values = defaults;
    if raw.is_empty() {
        return Ok(values);
    }

    let count = raw.split(',').count();
    if count > N {
        return Err(TemplateError::TooManyParameters {
            name,
            expected: N,
            got: count,
        });
    }

    for (slot, part) in values.iter_mut().zip(raw.split(',')) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        *slot = part
            .parse()
            .map_err(|err| TemplateError::InvalidParameter {
                name,
                value: part.to_owned(),
                source: err,
            })?;
    }

    Ok(values)
}

pub(super) fn no_params(name: &'static str, raw: &str) -> Result<(), TemplateError> {
    if raw.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::UnexpectedParameters { name })
    }
}

pub(super) fn pad_width(name: &'static str, value: i64) -> Result<usize, TemplateError> {
    usize::try_from(value).map_err(|_overflow| TemplateError::NegativePad { name, value })
}
