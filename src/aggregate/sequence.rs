use std::collections::BTreeMap;

use crate::core::SequenceGap;

/// Series identifier used when the source schema exposes no usable series
/// at the point sequence tracking occurs — true for every schema read here.
pub const DEFAULT_SERIES: &str = "1";

/// Collects one document number per document, keyed by (issuer, series),
/// and reports the numbers missing inside each run.
///
/// Detection is batch-local: only integers strictly between two observed
/// numbers can be reported. A gap at the very start or end of an issuer's
/// numbering run is invisible to a single batch.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    seen: BTreeMap<(String, String), Vec<i64>>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed document number. Numbers that do not parse as
    /// integers are ignored, consistent with tolerant field extraction.
    pub fn record(&mut self, issuer_tax_id: &str, series: &str, number: &str) {
        let Ok(parsed) = number.trim().parse::<i64>() else {
            return;
        };
        self.seen
            .entry((issuer_tax_id.to_string(), series.to_string()))
            .or_default()
            .push(parsed);
    }

    /// Sorts each run ascending and reports every integer strictly between
    /// adjacent observed pairs. Runs without gaps produce no entry; runs
    /// with fewer than two numbers never can.
    pub fn finalize(self) -> Vec<SequenceGap> {
        let mut gaps = Vec::new();
        for ((issuer_tax_id, series), mut numbers) in self.seen {
            numbers.sort_unstable();
            let mut missing = Vec::new();
            for pair in numbers.windows(2) {
                for skipped in pair[0] + 1..pair[1] {
                    missing.push(skipped.to_string());
                }
            }
            if !missing.is_empty() {
                gaps.push(SequenceGap {
                    issuer_tax_id,
                    series,
                    missing,
                });
            }
        }
        gaps
    }
}
