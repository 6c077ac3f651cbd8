//! Price filter over a consolidated table.
//!
//! Keeps the rows priced at or below a threshold and writes them, with the
//! input's header line, to a copy named after the input file. Prices and the
//! threshold go through the same currency cleanup as normalization, so every
//! table the aggregator writes is readable here.

use std::path::{Path, PathBuf};

use fare_core::config::FilterConfig;
use fare_core::{Error, Result};
use fare_ingestion::clean_price;
use fare_ingestion::parser::{content_lines, split_line, Separator};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of a filter run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    /// Data rows at or below the threshold.
    pub kept: usize,
    /// Data rows above the threshold or without a price.
    pub dropped: usize,
    /// Where the filtered copy was written.
    pub output: PathBuf,
}

/// Filters tables by their price column.
#[derive(Debug, Clone)]
pub struct PriceFilter {
    config: FilterConfig,
}

impl PriceFilter {
    /// Create a filter with the given configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Parse a threshold written as currency text, e.g. `"400"` or `"R$ 1.200,00"`.
    pub fn parse_threshold(max_price: &str) -> Result<f64> {
        clean_price(max_price)
            .parse()
            .map_err(|_| Error::config(format!("invalid maximum price: {max_price:?}")))
    }

    /// Filter table text in memory. Returns the output text and the kept and
    /// dropped row counts.
    pub fn filter_text(&self, text: &str, max_price: f64) -> Result<(String, usize, usize)> {
        let mut lines = content_lines(text);
        let header_line = lines
            .next()
            .ok_or_else(|| Error::data("input table is empty"))?;

        let sep = Separator::detect(header_line);
        let price_idx = split_line(header_line, sep)
            .iter()
            .position(|name| name.eq_ignore_ascii_case(&self.config.price_column))
            .ok_or_else(|| Error::missing_column(&self.config.price_column))?;

        let mut out = String::with_capacity(text.len());
        out.push_str(header_line);
        out.push('\n');

        let (mut kept, mut dropped) = (0, 0);
        for line in lines {
            let cells = split_line(line, sep);
            let price = cells
                .get(price_idx)
                .and_then(|cell| clean_price(cell).parse::<f64>().ok());
            match price {
                Some(p) if p <= max_price => {
                    out.push_str(line);
                    out.push('\n');
                    kept += 1;
                }
                _ => dropped += 1,
            }
        }
        Ok((out, kept, dropped))
    }

    /// Filter a table file and write the copy to the output directory.
    pub async fn apply(&self, input: &Path, max_price: &str) -> Result<FilterSummary> {
        let threshold = Self::parse_threshold(max_price)?;
        let file_name = input
            .file_name()
            .ok_or_else(|| Error::config(format!("not a file path: {}", input.display())))?;

        let text = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| Error::read(input, e))?;
        let (filtered, kept, dropped) = self.filter_text(&text, threshold)?;

        let output = self.config.output_dir.join(file_name);
        if !self.config.output_dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&self.config.output_dir)
                .await
                .map_err(|e| Error::write(&self.config.output_dir, e))?;
        }
        tokio::fs::write(&output, filtered)
            .await
            .map_err(|e| Error::write(&output, e))?;

        info!(kept, dropped, max_price = threshold, output = %output.display(), "filter complete");
        Ok(FilterSummary {
            kept,
            dropped,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "date,route,stamp,airline,iata,stops,dep,arr,price_brl,all_prices_brl,source,screenshot\n\
        2025-11-29,GYN-CAC,s1,GOL,G3,0,06:00,08:00,350.00,,,\n\
        2025-11-29,GYN-CAC,s1,AZUL,AD,1,07:00,10:00,400.00,,,\n\
        2025-11-30,GYN-CAC,s2,LATAM,LA,1,09:00,12:00,1234.56,,,\n\
        2025-11-30,GYN-CAC,s2,GOL,G3,0,11:00,13:00,,,,\n";

    #[test]
    fn test_parse_threshold() {
        approx::assert_relative_eq!(PriceFilter::parse_threshold("400").unwrap(), 400.0);
        approx::assert_relative_eq!(
            PriceFilter::parse_threshold("R$ 1.200,00").unwrap(),
            1200.0
        );
        assert!(matches!(
            PriceFilter::parse_threshold("cheap"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_keeps_rows_at_or_below_threshold() {
        let filter = PriceFilter::new(FilterConfig::default());
        let (out, kept, dropped) = filter.filter_text(TABLE, 400.0).unwrap();
        assert_eq!((kept, dropped), (2, 2));

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], TABLE.lines().next().unwrap());
        assert!(lines[1].contains(",GOL,"));
        assert!(lines[2].contains(",AZUL,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_thousands_price_not_misread() {
        let filter = PriceFilter::new(FilterConfig::default());
        let (_, kept, _) = filter.filter_text(TABLE, 1234.56).unwrap();
        assert_eq!(kept, 3);
    }

    #[test]
    fn test_column_match_is_case_insensitive() {
        let filter = PriceFilter::new(FilterConfig::default());
        let text = "Date;PRICE_BRL\n2025-11-30;R$ 99,90\n2025-11-30;R$ 1.099,90\n";
        let (out, kept, dropped) = filter.filter_text(text, 100.0).unwrap();
        assert_eq!((kept, dropped), (1, 1));
        assert!(out.ends_with("2025-11-30;R$ 99,90\n"));
    }

    #[test]
    fn test_missing_column_and_empty_input() {
        let filter = PriceFilter::new(FilterConfig::default());
        assert!(matches!(
            filter.filter_text("date,price\n", 1.0),
            Err(Error::MissingColumn(_))
        ));
        assert!(matches!(filter.filter_text("\n", 1.0), Err(Error::Data(_))));
    }

    #[tokio::test]
    async fn test_apply_writes_named_copy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("2025-11-13_BSB-IGU.csv");
        std::fs::write(&input, TABLE).unwrap();

        let filter = PriceFilter::new(FilterConfig {
            output_dir: dir.path().join("resumo"),
            ..FilterConfig::default()
        });
        let summary = filter.apply(&input, "400").await.unwrap();

        assert_eq!(summary.kept, 2);
        assert_eq!(
            summary.output,
            dir.path().join("resumo").join("2025-11-13_BSB-IGU.csv")
        );
        let written = std::fs::read_to_string(&summary.output).unwrap();
        assert_eq!(written.lines().count(), 3);
    }
}
