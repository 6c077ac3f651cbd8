//! Core data types for the fare aggregator.

use std::path::{Component, Path};

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Price type with ordering support.
pub type Price = OrderedFloat<f64>;

/// Fields of the consolidated table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Route,
    Stamp,
    Airline,
    Iata,
    Stops,
    Dep,
    Arr,
    PriceBrl,
    AllPricesBrl,
    Source,
    Screenshot,
}

impl CanonicalField {
    /// Every field in output order. Reordering this breaks downstream consumers.
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::Date,
        CanonicalField::Route,
        CanonicalField::Stamp,
        CanonicalField::Airline,
        CanonicalField::Iata,
        CanonicalField::Stops,
        CanonicalField::Dep,
        CanonicalField::Arr,
        CanonicalField::PriceBrl,
        CanonicalField::AllPricesBrl,
        CanonicalField::Source,
        CanonicalField::Screenshot,
    ];

    /// Column name in the output header.
    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::Route => "route",
            CanonicalField::Stamp => "stamp",
            CanonicalField::Airline => "airline",
            CanonicalField::Iata => "iata",
            CanonicalField::Stops => "stops",
            CanonicalField::Dep => "dep",
            CanonicalField::Arr => "arr",
            CanonicalField::PriceBrl => "price_brl",
            CanonicalField::AllPricesBrl => "all_prices_brl",
            CanonicalField::Source => "source",
            CanonicalField::Screenshot => "screenshot",
        }
    }
}

/// One row of a result file, keyed by its header cells.
///
/// Keeps header insertion order. A repeated header name keeps its first
/// position and takes the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Value of a column, if the header had it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate columns in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Run metadata inferred from where a result file is stored.
///
/// Layout: `<date>_<route>/<stamp>/<result-file>`, relative to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub date: String,
    pub route: String,
    pub stamp: String,
}

impl RunContext {
    /// Infer the context from a result file path relative to the root.
    ///
    /// Components that are missing or don't fit the layout yield empty strings.
    pub fn from_relative_path(path: &Path) -> Self {
        let dirs: Vec<String> = path
            .parent()
            .map(|p| {
                p.components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut ctx = RunContext::default();
        if let Some(date_route) = dirs.first() {
            if date_route.contains('_') {
                let mut parts = date_route.split('_');
                ctx.date = parts.next().unwrap_or_default().to_string();
                ctx.route = parts.next().unwrap_or_default().to_string();
            }
        }
        if let Some(stamp) = dirs.get(1) {
            ctx.stamp = stamp.clone();
        }
        ctx
    }
}

/// A normalized row of the consolidated table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub date: String,
    pub route: String,
    pub stamp: String,
    pub airline: String,
    pub iata: String,
    pub stops: String,
    pub dep: String,
    pub arr: String,
    /// Fixed-point decimal with two fraction digits, or empty.
    pub price_brl: String,
    pub all_prices_brl: String,
    pub source: String,
    pub screenshot: String,
}

impl CanonicalRecord {
    /// Value of a field.
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Date => &self.date,
            CanonicalField::Route => &self.route,
            CanonicalField::Stamp => &self.stamp,
            CanonicalField::Airline => &self.airline,
            CanonicalField::Iata => &self.iata,
            CanonicalField::Stops => &self.stops,
            CanonicalField::Dep => &self.dep,
            CanonicalField::Arr => &self.arr,
            CanonicalField::PriceBrl => &self.price_brl,
            CanonicalField::AllPricesBrl => &self.all_prices_brl,
            CanonicalField::Source => &self.source,
            CanonicalField::Screenshot => &self.screenshot,
        }
    }

    /// Mutable access to a field.
    pub fn get_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::Date => &mut self.date,
            CanonicalField::Route => &mut self.route,
            CanonicalField::Stamp => &mut self.stamp,
            CanonicalField::Airline => &mut self.airline,
            CanonicalField::Iata => &mut self.iata,
            CanonicalField::Stops => &mut self.stops,
            CanonicalField::Dep => &mut self.dep,
            CanonicalField::Arr => &mut self.arr,
            CanonicalField::PriceBrl => &mut self.price_brl,
            CanonicalField::AllPricesBrl => &mut self.all_prices_brl,
            CanonicalField::Source => &mut self.source,
            CanonicalField::Screenshot => &mut self.screenshot,
        }
    }

    /// Field values in output order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        CanonicalField::ALL.iter().map(move |&f| self.get(f))
    }

    /// Price as a number. Empty or unparseable prices rank above every real price.
    #[inline]
    pub fn price_key(&self) -> Price {
        OrderedFloat(self.price_brl.parse::<f64>().unwrap_or(f64::INFINITY))
    }

    /// Whether `date` is a fixed-width ISO `YYYY-MM-DD` date.
    ///
    /// Lexical ordering of the table only matches calendar order when this holds.
    pub fn has_iso_date(&self) -> bool {
        self.date.len() == 10 && NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_field_order() {
        let names: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names.join(","),
            "date,route,stamp,airline,iata,stops,dep,arr,price_brl,all_prices_brl,source,screenshot"
        );
    }

    #[test]
    fn test_raw_record_duplicate_header_last_wins() {
        let record: RawRecord = [("price", "1"), ("airline", "GOL"), ("price", "2")]
            .into_iter()
            .collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("price"), Some("2"));
        assert_eq!(record.iter().next(), Some(("price", "2")));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_run_context_from_layout() {
        let path = PathBuf::from("2025-11-30_GYN-CAC/2025-11-30T10-00-00-000Z/results.csv");
        let ctx = RunContext::from_relative_path(&path);
        assert_eq!(ctx.date, "2025-11-30");
        assert_eq!(ctx.route, "GYN-CAC");
        assert_eq!(ctx.stamp, "2025-11-30T10-00-00-000Z");
    }

    #[test]
    fn test_run_context_shallow_paths() {
        let ctx = RunContext::from_relative_path(Path::new("results.csv"));
        assert_eq!(ctx, RunContext::default());

        let ctx = RunContext::from_relative_path(Path::new("2025-11-30_GYN-CAC/results.csv"));
        assert_eq!(ctx.date, "2025-11-30");
        assert_eq!(ctx.route, "GYN-CAC");
        assert_eq!(ctx.stamp, "");

        let ctx = RunContext::from_relative_path(Path::new("misc/run1/results.csv"));
        assert_eq!(ctx.date, "");
        assert_eq!(ctx.route, "");
        assert_eq!(ctx.stamp, "run1");
    }

    #[test]
    fn test_price_key_empty_is_infinite() {
        let priced = CanonicalRecord {
            price_brl: "99.90".to_string(),
            ..Default::default()
        };
        let empty = CanonicalRecord::default();
        approx::assert_relative_eq!(priced.price_key().into_inner(), 99.9);
        assert!(empty.price_key().into_inner().is_infinite());
        assert!(priced.price_key() < empty.price_key());
    }

    #[test]
    fn test_iso_date_check() {
        let mut record = CanonicalRecord {
            date: "2025-11-30".to_string(),
            ..Default::default()
        };
        assert!(record.has_iso_date());
        record.date = "30/11/2025".to_string();
        assert!(!record.has_iso_date());
        record.date = "2025-1-30".to_string();
        assert!(!record.has_iso_date());
    }
}
