//! Categorical counts for bar charts

use std::collections::HashMap;

use crate::executor::GroupCount;

use super::request::LabeledCount;

/// Merge per-chunk group counts into one series.
///
/// NULL values are counted under the empty label. The series is ordered by
/// count descending, then label ascending.
pub fn bar_series(rows: Vec<GroupCount>) -> Vec<LabeledCount> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for row in rows {
        let label = row.labels.into_iter().next().flatten().unwrap_or_default();
        *totals.entry(label).or_default() += row.count;
    }

    let mut series: Vec<LabeledCount> = totals
        .into_iter()
        .map(|(label, value)| LabeledCount::new(label, value))
        .collect();
    series.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    series
}
