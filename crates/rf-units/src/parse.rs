//! Unit-string parsing shared by every quantity type

use thiserror::Error;

/// Errors produced while reading a quantity string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("empty quantity string")]
    Empty,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown unit '{unit}' in '{input}'")]
    UnknownUnit { unit: String, input: String },

    #[error("missing unit after {0}")]
    MissingUnit(i64),

    #[error("quantity '{0}' overflows")]
    Overflow(String),
}

/// Parse a string of one or more `<amount> <unit>` pairs into base units.
///
/// `units` maps a unit name to its multiplier. The pairs are summed, so
/// `"1 L 250 ml"` reads as 1250 with a millilitre table. The space between
/// amount and unit is optional. A lone integer is returned unchanged.
pub fn parse_quantity(input: &str, units: &[(&str, i64)]) -> Result<i64, UnitError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }

    let mut total: i64 = 0;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let digits_end = rest
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '-')))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(digits_end);
        let amount: i64 = number
            .parse()
            .map_err(|_| UnitError::InvalidNumber(number.to_string()))?;

        let tail = tail.trim_start();
        let unit_end = tail
            .char_indices()
            .find(|(_, c)| c.is_whitespace() || c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .unwrap_or(tail.len());
        let (unit, after) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(UnitError::MissingUnit(amount));
        }

        let multiplier = units
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(unit))
            .map(|(_, m)| *m)
            .ok_or_else(|| UnitError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

        let value = amount
            .checked_mul(multiplier)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| UnitError::Overflow(input.to_string()))?;
        total = value;
        rest = after.trim_start();
    }

    Ok(total)
}

/// Serde helper: quantities arrive either as a string or as a bare integer.
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub(crate) enum RawQuantity {
    Int(i64),
    Text(String),
}

impl RawQuantity {
    pub(crate) fn resolve(self, units: &[(&str, i64)]) -> Result<i64, UnitError> {
        match self {
            RawQuantity::Int(v) => Ok(v),
            RawQuantity::Text(s) => parse_quantity(&s, units),
        }
    }
}
