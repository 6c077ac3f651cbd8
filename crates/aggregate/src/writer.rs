//! CSV serialization of the consolidated table.
//!
//! Output quoting is standard CSV, stricter than what the input parser
//! accepts: a value containing a comma, semicolon, double quote or newline is
//! wrapped in quotes with inner quotes doubled.

use std::path::Path;

use fare_core::{CanonicalField, CanonicalRecord, Error, Result};

fn needs_quotes(value: &str) -> bool {
    value.contains([',', ';', '"', '\n'])
}

fn push_field(buf: &mut String, value: &str) {
    if needs_quotes(value) {
        buf.push('"');
        buf.push_str(&value.replace('"', "\"\""));
        buf.push('"');
    } else {
        buf.push_str(value);
    }
}

/// Header line of the consolidated table, without line terminator.
pub fn header_line() -> String {
    CanonicalField::ALL
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize records, header first, every line `\n` terminated.
pub fn to_csv_string(records: &[CanonicalRecord]) -> String {
    let mut buf = header_line();
    buf.push('\n');
    for record in records {
        for (i, value) in record.values().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            push_field(&mut buf, value);
        }
        buf.push('\n');
    }
    buf
}

/// Serialize and write the table in a single write, creating the parent
/// directory if needed.
pub async fn write_csv(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    let contents = to_csv_string(records);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::write(parent, e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| Error::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "date,route,stamp,airline,iata,stops,dep,arr,price_brl,all_prices_brl,source,screenshot";

    #[test]
    fn test_header_only() {
        let csv = to_csv_string(&[]);
        assert_eq!(csv, format!("{HEADER}\n"));
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_row_in_canonical_order() {
        let record = CanonicalRecord {
            date: "2025-11-30".to_string(),
            route: "GYN-CAC".to_string(),
            airline: "GOL".to_string(),
            price_brl: "420.99".to_string(),
            ..Default::default()
        };
        let csv = to_csv_string(&[record]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "2025-11-30,GYN-CAC,,GOL,,,,,420.99,,,");
    }

    #[test]
    fn test_quoting() {
        let record = CanonicalRecord {
            airline: "Azul \"Linhas\"".to_string(),
            all_prices_brl: "420.99;500.00".to_string(),
            source: "https://x.test/?a=1,b=2".to_string(),
            stops: "1\nconexao".to_string(),
            ..Default::default()
        };
        let csv = to_csv_string(&[record]);
        assert!(csv.contains("\"Azul \"\"Linhas\"\"\""));
        assert!(csv.contains("\"420.99;500.00\""));
        assert!(csv.contains("\"https://x.test/?a=1,b=2\""));
        assert!(csv.contains("\"1\nconexao\""));
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("results.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale contents that are longer than the header\n".repeat(10)).unwrap();

        write_csv(&path, &[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{HEADER}\n"));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("public");
        std::fs::write(&blocker, "").unwrap();

        let err = write_csv(&blocker.join("results.csv"), &[]).await.unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
