// Union-date alignment of independently sampled daily series

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

/// Several daily series joined onto one chronological axis.
///
/// `dates` is the sorted union of every source's dates. `columns[s][i]` is
/// source `s` at `dates[i]`, `None` where that source has no value for the
/// day. The missing sentinel is never coerced to zero, so renderers show a
/// gap instead of a false zero reading.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrame {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<Vec<Option<f64>>>,
}

/// Aligns the given per-date series, producing one column per source in
/// input order. Identical inputs always produce an identical frame.
pub fn align(sources: &[&BTreeMap<NaiveDate, f64>]) -> AlignedFrame {
    let dates: Vec<NaiveDate> = sources
        .iter()
        .flat_map(|source| source.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns = sources
        .iter()
        .map(|source| dates.iter().map(|date| source.get(date).copied()).collect())
        .collect();

    AlignedFrame { dates, columns }
}
