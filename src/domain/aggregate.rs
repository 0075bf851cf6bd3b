// Calendar-day grouping and mean reduction for observation series

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Reduces a series of timestamped items to one unweighted mean per
/// calendar day.
///
/// Items are grouped by the date `date_of` yields. The group mean covers
/// every `Some` value `value_of` yields, so items with identical timestamps
/// still count independently. Days contributing no value at all are absent
/// from the result rather than reported as zero.
pub fn daily_mean<T>(
    items: &[T],
    date_of: impl Fn(&T) -> NaiveDate,
    value_of: impl Fn(&T) -> Option<f64>,
) -> BTreeMap<NaiveDate, f64> {
    let mut groups: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();

    for item in items {
        if let Some(value) = value_of(item) {
            let entry = groups.entry(date_of(item)).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(date, (sum, count))| (date, sum / f64::from(count)))
        .collect()
}
