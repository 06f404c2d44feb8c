use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::numeric::parse_amount;
use crate::core::{LineRecord, MonthlyRevenue, NcmSummary};

/// Single-owner accumulator for one batch run.
///
/// Feed every extracted record through [`add_record`], then consume the
/// state with [`finalize`]. Keys live in `BTreeMap`s so finalized output is
/// sorted lexicographically — the required order for both NCM codes and
/// `YYYY-MM` month keys.
///
/// [`add_record`]: Aggregator::add_record
/// [`finalize`]: Aggregator::finalize
#[derive(Debug, Default)]
pub struct Aggregator {
    by_ncm: BTreeMap<String, NcmBucket>,
    by_month: BTreeMap<String, MonthBucket>,
}

#[derive(Debug, Default)]
struct NcmBucket {
    quantity: Decimal,
    value: Decimal,
    pis: Decimal,
    cofins: Decimal,
    icms: Decimal,
}

#[derive(Debug, Default)]
struct MonthBucket {
    revenue: Decimal,
    icms: Decimal,
    pis: Decimal,
    cofins: Decimal,
}

/// Sorted output of [`Aggregator::finalize`].
#[derive(Debug, Clone)]
pub struct AggregateTotals {
    /// Per-NCM summaries, sorted by code.
    pub ncm_summaries: Vec<NcmSummary>,
    /// Per-month totals, sorted by month.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Distinct classification codes, sorted.
    pub ncm_codes: Vec<String>,
    /// Distinct months, sorted.
    pub months: Vec<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the NCM and monthly buckets.
    ///
    /// A record without a classification code contributes to no NCM bucket
    /// but still counts toward monthly revenue. A record whose timestamp
    /// does not resolve to a calendar month is left out of the monthly view
    /// entirely rather than pooled into a catch-all bucket.
    pub fn add_record(&mut self, record: &LineRecord) {
        let quantity = parse_amount(&record.quantity);
        let line_value = quantity * parse_amount(&record.unit_price);
        let pis = parse_amount(&record.pis);
        let cofins = parse_amount(&record.cofins);
        let icms = parse_amount(&record.icms);

        if !record.ncm.is_empty() {
            let bucket = self.by_ncm.entry(record.ncm.clone()).or_default();
            bucket.quantity += quantity;
            bucket.value += line_value;
            bucket.pis += pis;
            bucket.cofins += cofins;
            bucket.icms += icms;
        }

        if let Some(month) = month_key(&record.issued_at) {
            let bucket = self.by_month.entry(month).or_default();
            bucket.revenue += line_value;
            bucket.icms += icms;
            bucket.pis += pis;
            bucket.cofins += cofins;
        }
    }

    /// Consumes the accumulated state into immutable, sorted summaries.
    pub fn finalize(self) -> AggregateTotals {
        let ncm_codes: Vec<String> = self.by_ncm.keys().cloned().collect();
        let months: Vec<String> = self.by_month.keys().cloned().collect();

        let ncm_summaries = self
            .by_ncm
            .into_iter()
            .map(|(ncm, bucket)| NcmSummary {
                ncm,
                total_quantity: bucket.quantity,
                total_value: bucket.value,
                total_pis: bucket.pis,
                total_cofins: bucket.cofins,
                total_icms: bucket.icms,
                pis_share: tax_share(bucket.pis, bucket.value),
                cofins_share: tax_share(bucket.cofins, bucket.value),
                icms_share: tax_share(bucket.icms, bucket.value),
            })
            .collect();

        let monthly_revenue = self
            .by_month
            .into_iter()
            .map(|(month, bucket)| MonthlyRevenue {
                month,
                total_revenue: bucket.revenue,
                total_icms: bucket.icms,
                total_pis: bucket.pis,
                total_cofins: bucket.cofins,
            })
            .collect();

        AggregateTotals {
            ncm_summaries,
            monthly_revenue,
            ncm_codes,
            months,
        }
    }
}

/// `YYYY-MM` bucket key: the timestamp's date portion (before any `T` or
/// space) must parse as a calendar date. `None` otherwise.
fn month_key(issued_at: &str) -> Option<String> {
    let date_part = issued_at.split(['T', ' ']).next().unwrap_or_default();
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some(date.format("%Y-%m").to_string())
}

/// `tax / total × 100` with two decimals; `"0.00"` for an empty total.
fn tax_share(tax: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", (tax * dec!(100) / total).round_dp(2))
}
