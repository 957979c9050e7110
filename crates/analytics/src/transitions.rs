//! Day-to-day sentiment transition probabilities.

use fear_greed_core::Classification;
use fear_greed_data::{SentimentRecord, Table};
use serde::{Deserialize, Serialize};

const N: usize = Classification::ALL.len();

/// Empirical next-day classification probabilities.
///
/// Rows are the current day's classification, columns the next day's, both
/// in [`Classification::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    /// Raw (current, next) pair counts.
    pub counts: [[u32; N]; N],
    /// Row-normalized counts. A row with no observed successor stays all zero.
    pub probabilities: [[f64; N]; N],
}

impl TransitionMatrix {
    /// Probability that a `from` day is followed by a `to` day.
    #[must_use]
    pub fn probability(&self, from: Classification, to: Classification) -> f64 {
        self.probabilities[from.index()][to.index()]
    }

    /// Number of observed transitions out of `from`.
    #[must_use]
    pub fn row_total(&self, from: Classification) -> u32 {
        self.counts[from.index()].iter().sum()
    }

    /// Square probability table labelled by classification on both axes.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(
            std::iter::once("").chain(Classification::ALL.iter().map(Classification::as_str)),
        );
        for from in Classification::ALL {
            table.push_row(
                std::iter::once(from.to_string()).chain(
                    self.probabilities[from.index()]
                        .iter()
                        .map(ToString::to_string),
                ),
            );
        }
        table
    }
}

/// Builds the transition matrix from daily readings.
///
/// Readings are ordered by timestamp first; each reading is paired with the
/// one immediately after it. The last reading has no successor and adds nothing.
#[must_use]
pub fn transition_matrix(sentiment: &[SentimentRecord]) -> TransitionMatrix {
    let mut ordered: Vec<&SentimentRecord> = sentiment.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let mut counts = [[0u32; N]; N];
    for pair in ordered.windows(2) {
        let from = pair[0].classification.index();
        let to = pair[1].classification.index();
        counts[from][to] += 1;
    }

    let mut probabilities = [[0.0f64; N]; N];
    for (row, probs) in counts.iter().zip(probabilities.iter_mut()) {
        let total: u32 = row.iter().sum();
        if total == 0 {
            continue;
        }
        for (count, p) in row.iter().zip(probs.iter_mut()) {
            *p = f64::from(*count) / f64::from(total);
        }
    }

    tracing::debug!(
        readings = ordered.len(),
        transitions = ordered.len().saturating_sub(1),
        "Built transition matrix"
    );

    TransitionMatrix {
        counts,
        probabilities,
    }
}
