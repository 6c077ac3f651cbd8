//! Ordering of the consolidated table.

use fare_core::CanonicalRecord;

/// Sort by date, then by price ascending. Stable.
///
/// Dates compare as plain strings, which matches calendar order only for
/// fixed-width `YYYY-MM-DD` values. Records without a price sort after every
/// priced record of the same date.
pub fn sort_records(records: &mut [CanonicalRecord]) {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.price_key().cmp(&b.price_key()))
    });
}
