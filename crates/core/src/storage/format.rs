use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::CoreError;
use crate::models::portfolio::Snapshot;
use crate::models::stock::normalize_symbol;

/// Separator between symbol and quantity on a holding line.
pub const FIELD_SEPARATOR: char = ',';

/// Render a snapshot as newline-delimited text.
///
/// Layout:
/// ```text
/// <balance>
/// <symbol>,<quantity>
/// <symbol>,<quantity>
/// ```
/// Holdings are written in symbol order, one per line, no header.
pub fn encode(snapshot: &Snapshot) -> String {
    let mut out = String::with_capacity(16 + snapshot.holdings.len() * 16);
    out.push_str(&snapshot.balance.to_string());
    out.push('\n');
    for (symbol, quantity) in &snapshot.holdings {
        out.push_str(symbol);
        out.push(FIELD_SEPARATOR);
        out.push_str(&quantity.to_string());
        out.push('\n');
    }
    out
}

/// Parse snapshot text. The whole input is validated before a snapshot
/// is returned, so a caller never sees a partially read one.
///
/// Rules:
/// - line 1 is the balance: a non-negative decimal
/// - every further non-blank line is `symbol,quantity` with a non-empty
///   symbol and a positive integer quantity
/// - a symbol may appear only once (compared case-insensitively)
pub fn decode(text: &str) -> Result<Snapshot, CoreError> {
    let mut lines = text.lines().enumerate();

    let (_, first) = lines
        .next()
        .ok_or_else(|| CoreError::InvalidFileFormat("File is empty".into()))?;
    let balance = parse_balance(first)?;

    let mut holdings = BTreeMap::new();
    for (idx, raw) in lines {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (symbol, quantity) = parse_holding(line, line_no)?;
        if holdings.insert(symbol.clone(), quantity).is_some() {
            return Err(CoreError::InvalidFileFormat(format!(
                "Line {line_no}: duplicate holding for {symbol}"
            )));
        }
    }

    Ok(Snapshot { balance, holdings })
}

fn parse_balance(line: &str) -> Result<Decimal, CoreError> {
    let trimmed = line.trim();
    let balance = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| {
            CoreError::InvalidFileFormat(format!("Line 1: invalid balance {trimmed:?}"))
        })?;

    if balance < Decimal::ZERO {
        return Err(CoreError::InvalidFileFormat(format!(
            "Line 1: balance {balance} is negative"
        )));
    }
    Ok(balance)
}

fn parse_holding(line: &str, line_no: usize) -> Result<(String, u64), CoreError> {
    let (symbol, quantity) = line.split_once(FIELD_SEPARATOR).ok_or_else(|| {
        CoreError::InvalidFileFormat(format!(
            "Line {line_no}: expected symbol,quantity but got {line:?}"
        ))
    })?;

    let symbol = normalize_symbol(symbol);
    if symbol.is_empty() {
        return Err(CoreError::InvalidFileFormat(format!(
            "Line {line_no}: missing symbol"
        )));
    }

    let quantity_text = quantity.trim();
    let quantity: u64 = quantity_text.parse().map_err(|_| {
        CoreError::InvalidFileFormat(format!(
            "Line {line_no}: invalid quantity {quantity_text:?} for {symbol}"
        ))
    })?;
    if quantity == 0 {
        return Err(CoreError::InvalidFileFormat(format!(
            "Line {line_no}: quantity for {symbol} must be positive"
        )));
    }

    Ok((symbol, quantity))
}
