//! Monthly aggregation: sign partitioning, (month, category) bucketing,
//! percent-of-total shares, and the net balance trend.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::palette::CategoryColorMap;
use crate::transaction::{Transaction, month_start};

/// Which sign partition a bucket belongs to. Gains and spends are stacked as
/// separate visual bands so signed amounts never cancel within a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignGroup {
    #[serde(rename = "gain")]
    Gain,
    #[serde(rename = "spend")]
    Spend,
}

impl SignGroup {
    pub fn contains(&self, txn: &Transaction) -> bool {
        match self {
            SignGroup::Gain => txn.is_gain(),
            SignGroup::Spend => txn.is_spend(),
        }
    }

    /// Visual offset applied to `display_month` so the two partitions' bar
    /// groups for the same month do not overlap. Presentation-only: the true
    /// month key is never shifted.
    pub fn display_offset_days(&self) -> i64 {
        match self {
            SignGroup::Gain => -5,
            SignGroup::Spend => 5,
        }
    }
}

/// Sum of one category's transactions within one month and sign partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCategoryBucket {
    /// First day of the month (the true join key)
    pub month: NaiveDate,
    pub category: String,
    pub sign_group: SignGroup,
    /// Signed sum of amounts in this bucket
    pub absolute_spend: f64,
    /// Sum of `absolute_spend` across all categories for this month+partition
    pub total_amount: f64,
    /// `absolute_spend / total_amount`, 0.0 when the total is zero
    pub percent_spend: f64,
    /// `month` shifted by the partition's visual offset, for rendering only
    pub display_month: NaiveDate,
}

/// Net signed sum of all transactions in one month, category-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: NaiveDate,
    pub amount: f64,
}

/// All derived tables, computed wholesale from the cleaned transaction set.
/// Immutable after construction; UI interactions only re-read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub gain: Vec<MonthlyCategoryBucket>,
    pub spend: Vec<MonthlyCategoryBucket>,
    pub totals: Vec<MonthlyTotal>,
    pub colors: CategoryColorMap,
}

impl Aggregates {
    /// Run the full aggregation pass over cleaned transactions.
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        Self {
            gain: aggregate_partition(txns, SignGroup::Gain),
            spend: aggregate_partition(txns, SignGroup::Spend),
            totals: monthly_totals(txns),
            colors: CategoryColorMap::from_transactions(txns),
        }
    }

    pub fn buckets(&self, group: SignGroup) -> &[MonthlyCategoryBucket] {
        match group {
            SignGroup::Gain => &self.gain,
            SignGroup::Spend => &self.spend,
        }
    }

    /// Per-month `total_amount` for one partition, keyed by the true month.
    pub fn month_totals(&self, group: SignGroup) -> BTreeMap<NaiveDate, f64> {
        self.buckets(group)
            .iter()
            .map(|b| (b.month, b.total_amount))
            .collect()
    }
}

/// Bucket one sign partition by (month, category), attach per-month totals,
/// and compute percent shares. Months with no transactions in the partition
/// simply produce no buckets.
fn aggregate_partition(txns: &[Transaction], group: SignGroup) -> Vec<MonthlyCategoryBucket> {
    let mut sums: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();
    for txn in txns.iter().filter(|t| group.contains(t)) {
        *sums.entry((txn.month(), txn.category.clone())).or_default() += txn.amount;
    }

    let mut month_totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for ((month, _), amount) in &sums {
        *month_totals.entry(*month).or_default() += amount;
    }

    // Join totals back onto the per-category buckets before applying the
    // display offset, so the offset never corrupts the month key.
    sums.into_iter()
        .map(|((month, category), absolute_spend)| {
            let total_amount = month_totals[&month];
            let percent_spend = if total_amount == 0.0 {
                0.0
            } else {
                absolute_spend / total_amount
            };
            MonthlyCategoryBucket {
                month,
                category,
                sign_group: group,
                absolute_spend,
                total_amount,
                percent_spend,
                display_month: month + Duration::days(group.display_offset_days()),
            }
        })
        .collect()
}

/// Net balance per month over the unsplit transaction set.
fn monthly_totals(txns: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for txn in txns {
        *totals.entry(month_start(txn.date)).or_default() += txn.amount;
    }
    totals
        .into_iter()
        .map(|(month, amount)| MonthlyTotal { month, amount })
        .collect()
}
