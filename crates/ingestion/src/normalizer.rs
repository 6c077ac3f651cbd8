//! Maps raw result rows onto the canonical schema.
//!
//! Capture scripts wrote the same logical field under different column names
//! (English and Portuguese). Each canonical field has an ordered alias list;
//! the first alias with a non-empty value wins.

use fare_core::{CanonicalField, CanonicalRecord, RawRecord, RunContext};

/// Accepted source columns per canonical field, in lookup order.
pub const ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Date, &["date", "data"]),
    (CanonicalField::Route, &["route", "rota"]),
    (
        CanonicalField::Stamp,
        &["stamp", "stamp_id", "run", "capture", "timestamp"],
    ),
    (CanonicalField::Airline, &["airline", "companhia", "cia"]),
    (CanonicalField::Iata, &["iata", "cia_iata"]),
    (
        CanonicalField::Stops,
        &["stops", "paradas", "escala", "escalas"],
    ),
    (CanonicalField::Dep, &["dep", "saida", "from_time"]),
    (CanonicalField::Arr, &["arr", "chegada", "to_time"]),
    (
        CanonicalField::PriceBrl,
        &["price_brl", "min_price_brl", "preco_brl", "preco", "price"],
    ),
    (
        CanonicalField::AllPricesBrl,
        &["all_prices_brl", "precos_brl", "prices_brl"],
    ),
    (CanonicalField::Source, &["url", "source", "href"]),
    (CanonicalField::Screenshot, &["screenshot", "print"]),
];

/// First non-empty value among `aliases`.
pub fn lookup<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .find(|value| !value.is_empty())
}

/// Value taken from the run's storage path when the row doesn't carry one.
fn fallback(field: CanonicalField, ctx: &RunContext) -> &str {
    match field {
        CanonicalField::Date => &ctx.date,
        CanonicalField::Route => &ctx.route,
        CanonicalField::Stamp => &ctx.stamp,
        _ => "",
    }
}

/// Normalize one raw row. Never fails; unmatched fields are empty.
pub fn normalize(record: &RawRecord, ctx: &RunContext) -> CanonicalRecord {
    let mut out = CanonicalRecord::default();
    for &(field, aliases) in ALIASES {
        let value = lookup(record, aliases).unwrap_or_else(|| fallback(field, ctx));
        *out.get_mut(field) = match field {
            CanonicalField::PriceBrl => clean_price(value),
            _ => value.to_string(),
        };
    }
    out
}

/// Turn locale-formatted currency text into a two-decimal string.
///
/// `"R$ 1.234,56"` becomes `"1234.56"`. Anything that doesn't yield a finite
/// number becomes an empty string.
pub fn clean_price(raw: &str) -> String {
    let kept: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    // Thousands separators are judged against the filtered text, before any
    // comma becomes a decimal point.
    let mut cleaned = String::with_capacity(kept.len());
    for (i, &c) in kept.iter().enumerate() {
        if c == '.' && is_thousands_separator(&kept, i) {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.replacen(',', ".", 1);

    match parse_number_prefix(&cleaned) {
        Some(value) if value.is_finite() => {
            // Ties round away from zero: 0.125 -> 0.13.
            let rounded = (value * 100.0).round() / 100.0;
            let value = if rounded.is_finite() { rounded } else { value };
            // Avoid "-0.00".
            let value = if value == 0.0 { 0.0 } else { value };
            format!("{value:.2}")
        }
        _ => String::new(),
    }
}

/// A period followed by exactly three digits and then a non-digit or the end.
fn is_thousands_separator(chars: &[char], i: usize) -> bool {
    let digits = chars[i + 1..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    digits == 3
}

/// Parse the longest leading decimal number: optional `-`, digits, optional
/// fraction. Trailing garbage is ignored.
fn parse_number_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }

    if !has_digits {
        return None;
    }
    s[..end].parse().ok()
}
