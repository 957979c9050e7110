//! Buy/sell mix per sentiment classification.

use fear_greed_core::{Classification, Side};
use fear_greed_data::{MergedRecord, Table};
use std::collections::{BTreeMap, BTreeSet};

/// Cross-tabulation of trade counts by (classification, side).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SideDistribution {
    /// Count per classification and side. Only observed classifications appear.
    pub counts: BTreeMap<Classification, BTreeMap<Side, usize>>,
    /// Sides observed anywhere in the data, in BUY, SELL, OTHER order.
    pub sides: BTreeSet<Side>,
}

impl SideDistribution {
    #[must_use]
    pub fn count(&self, classification: Classification, side: Side) -> usize {
        self.counts
            .get(&classification)
            .and_then(|row| row.get(&side))
            .copied()
            .unwrap_or(0)
    }

    /// Share of `classification`'s trades that were on `side`.
    ///
    /// NaN for a classification with no trades.
    #[must_use]
    pub fn fraction(&self, classification: Classification, side: Side) -> f64 {
        let total: usize = self
            .counts
            .get(&classification)
            .map_or(0, |row| row.values().sum());
        if total == 0 {
            return f64::NAN;
        }
        #[allow(clippy::cast_precision_loss)]
        let share = self.count(classification, side) as f64 / total as f64;
        share
    }

    /// Count table: one row per observed classification, one column per observed side.
    #[must_use]
    pub fn counts_table(&self) -> Table {
        self.table_with(|c, s| self.count(c, s).to_string())
    }

    /// Row-normalized version of [`Self::counts_table`].
    #[must_use]
    pub fn percentages_table(&self) -> Table {
        self.table_with(|c, s| self.fraction(c, s).to_string())
    }

    fn table_with<F>(&self, cell: F) -> Table
    where
        F: Fn(Classification, Side) -> String,
    {
        let mut table = Table::new(
            std::iter::once("classification").chain(self.sides.iter().map(Side::as_str)),
        );
        for &classification in self.counts.keys() {
            table.push_row(
                std::iter::once(classification.to_string())
                    .chain(self.sides.iter().map(|&side| cell(classification, side))),
            );
        }
        table
    }
}

/// Counts trades per (classification, side). Unclassified rows are skipped.
#[must_use]
pub fn side_distribution(rows: &[MergedRecord]) -> SideDistribution {
    let mut dist = SideDistribution::default();
    for row in rows {
        let Some(classification) = row.classification else {
            continue;
        };
        dist.sides.insert(row.side());
        *dist
            .counts
            .entry(classification)
            .or_default()
            .entry(row.side())
            .or_insert(0) += 1;
    }
    dist
}
