//! Plot-ready projection of a partition.

use serde::Serialize;

use crate::model::ProgressEntry;

/// A single plotted point. `x` is the entry's position in the partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub x: usize,
    pub y: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Minimum number of entries before a line chart is meaningful.
pub const MIN_SERIES_LEN: usize = 2;

/// Project entries into a series, keeping their order.
///
/// Returns `None` for fewer than two entries; callers render a placeholder in
/// that case. No date sort happens here: insertion order is the x-axis.
#[must_use]
pub fn project(entries: &[ProgressEntry]) -> Option<ChartSeries> {
    if entries.len() < MIN_SERIES_LEN {
        return None;
    }

    let points = entries
        .iter()
        .enumerate()
        .map(|(x, entry)| ChartPoint {
            x,
            y: entry.value(),
            label: entry.label().to_string(),
        })
        .collect();

    Some(ChartSeries { points })
}
