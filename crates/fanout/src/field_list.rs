//! Field-list decomposition
//!
//! The primary list (and the optional correlation list) are tokenized in
//! lockstep. Unit 0 is a sentinel carrying placeholder values; data units
//! follow from index 1. A primary token longer than 12 bytes is a range:
//! bytes `0..12` are the start value, bytes from 13 on (if any) are the
//! end-station suffix. Byte 12 is the range separator and is dropped.

use contracts::{ContractError, Document, FieldListConfig, SplitUnit};

const RANGE_START_LEN: usize = 12;

/// Split on any delimiter character, skipping empty tokens
pub(crate) fn tokenize<'a>(value: &'a str, delimiter: &'a str) -> impl Iterator<Item = &'a str> {
    value
        .split(move |c: char| delimiter.contains(c))
        .filter(|token| !token.is_empty())
}

pub(crate) fn decompose(
    cfg: &FieldListConfig,
    doc: &Document,
) -> Result<Vec<SplitUnit>, ContractError> {
    let primary = doc.value(&cfg.primary_path).ok_or_else(|| {
        ContractError::validation(&cfg.primary_path, "primary field list is missing")
    })?;

    let correlation: Vec<&str> = cfg
        .correlation_path
        .as_deref()
        .and_then(|path| doc.value(path))
        .map(|value| tokenize(value, &cfg.delimiter).collect())
        .unwrap_or_default();

    let mut units = vec![sentinel(cfg)];
    for (i, token) in tokenize(primary, &cfg.delimiter).enumerate() {
        let mut unit = SplitUnit::new(i + 1);
        if token.len() > RANGE_START_LEN {
            let (start, end) = split_range(&cfg.primary_path, token)?;
            unit = unit
                .with_field(&cfg.range_start_path, start)
                .with_field(&cfg.range_end_path, end);
        } else {
            unit = unit.with_field(&cfg.primary_path, token);
        }
        if let Some(path) = &cfg.correlation_path {
            let key = correlation.get(i).copied().unwrap_or(cfg.placeholder.as_str());
            unit = unit.with_field(path, key);
        }
        units.push(unit);
    }
    Ok(units)
}

fn sentinel(cfg: &FieldListConfig) -> SplitUnit {
    let mut unit = SplitUnit::sentinel().with_field(&cfg.primary_path, &cfg.placeholder);
    if let Some(path) = &cfg.correlation_path {
        unit = unit.with_field(path, &cfg.placeholder);
    }
    unit
}

fn split_range<'a>(field: &str, token: &'a str) -> Result<(&'a str, &'a str), ContractError> {
    let malformed = || ContractError::validation(field, format!("malformed range token '{token}'"));
    let start = token.get(..RANGE_START_LEN).ok_or_else(malformed)?;
    let end = if token.len() > RANGE_START_LEN + 1 {
        token.get(RANGE_START_LEN + 1..).ok_or_else(malformed)?
    } else {
        ""
    };
    Ok((start, end))
}

/// Unit message: the input with the primary list removed and the unit's
/// fields written in
pub(crate) fn reconstruct(cfg: &FieldListConfig, doc: &Document, unit: &SplitUnit) -> Document {
    let mut message = doc.clone();
    message.remove(&cfg.primary_path);
    for (path, value) in &unit.fields {
        message.set_value(path, value.as_str());
    }
    message
}
