//! Grouped views over joined trades, keyed by sentiment classification.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::JoinedRecord;

use super::stats::DescriptiveStats;

/// Trade counts per side label for one classification. Absent sides count
/// as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideCounts(BTreeMap<String, usize>);

impl SideCounts {
    pub fn get(&self, side: &str) -> usize {
        self.0.get(side).copied().unwrap_or(0)
    }

    fn add(&mut self, side: &str) {
        *self.0.entry(side.to_string()).or_insert(0) += 1;
    }

    /// Side labels present, ascending.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Count of the most frequent side.
    pub fn max(&self) -> usize {
        self.0.values().copied().max().unwrap_or(0)
    }
}

/// Round a PnL figure to cents for display, halves away from zero.
///
/// `Decimal`'s `{:.2}` truncates, so values go through here first.
pub fn round_pnl(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Summed PnL of one account within one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPnl {
    pub account: String,
    pub classification: String,
    pub closed_pnl: Decimal,
}

/// Per-group accumulators, collected in a single pass.
#[derive(Debug, Default)]
struct Group {
    pnl_sum: Decimal,
    pnl_values: Vec<f64>,
    positions: Vec<f64>,
    sides: SideCounts,
    winners: usize,
}

/// All grouped statistics the dashboard reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    /// Mean closed PnL per classification
    pub avg_pnl: BTreeMap<String, Decimal>,

    /// Total closed PnL per classification
    pub total_pnl: BTreeMap<String, Decimal>,

    /// Descriptive statistics of closed PnL per classification
    pub pnl_stats: BTreeMap<String, DescriptiveStats>,

    /// Descriptive statistics of start position per classification
    pub leverage_stats: BTreeMap<String, DescriptiveStats>,

    /// Trade counts per classification
    pub trade_counts: BTreeMap<String, usize>,

    /// Trade counts per classification and side
    pub side_counts: BTreeMap<String, SideCounts>,

    /// Fraction of trades with positive closed PnL per classification
    pub win_rate: BTreeMap<String, f64>,

    /// Summed closed PnL per (account, classification)
    pub account_pnl: Vec<AccountPnl>,

    /// Raw closed PnL values per classification, in trade order
    #[serde(skip)]
    pub pnl_values: BTreeMap<String, Vec<f64>>,

    /// Raw start positions per classification, in trade order
    #[serde(skip)]
    pub position_values: BTreeMap<String, Vec<f64>>,
}

impl Aggregates {
    pub fn compute(records: &[JoinedRecord]) -> Self {
        let mut groups: BTreeMap<&str, Group> = BTreeMap::new();
        let mut by_account: BTreeMap<(&str, &str), Decimal> = BTreeMap::new();

        for record in records {
            let trade = &record.trade;
            let group = groups.entry(record.classification.as_str()).or_default();

            group.pnl_sum += trade.closed_pnl;
            group.pnl_values.push(trade.closed_pnl.to_f64().unwrap_or(0.0));
            group.positions.push(trade.start_position);
            // blank sides stay out of the side pivot
            if !trade.side.is_empty() {
                group.sides.add(&trade.side);
            }
            if trade.is_profitable() {
                group.winners += 1;
            }

            *by_account
                .entry((trade.account.as_str(), record.classification.as_str()))
                .or_insert(Decimal::ZERO) += trade.closed_pnl;
        }

        let mut aggregates = Self::default();

        for (label, group) in groups {
            let count = group.positions.len();
            let label = label.to_string();

            aggregates
                .avg_pnl
                .insert(label.clone(), group.pnl_sum / Decimal::from(count));
            aggregates.total_pnl.insert(label.clone(), group.pnl_sum);
            aggregates
                .win_rate
                .insert(label.clone(), group.winners as f64 / count as f64);
            aggregates.trade_counts.insert(label.clone(), count);
            aggregates.side_counts.insert(label.clone(), group.sides);

            if let Some(stats) = DescriptiveStats::from_values(&group.pnl_values) {
                aggregates.pnl_stats.insert(label.clone(), stats);
            }
            if let Some(stats) = DescriptiveStats::from_values(&group.positions) {
                aggregates.leverage_stats.insert(label.clone(), stats);
            }

            aggregates.pnl_values.insert(label.clone(), group.pnl_values);
            aggregates.position_values.insert(label, group.positions);
        }

        aggregates.account_pnl = by_account
            .into_iter()
            .map(|((account, classification), closed_pnl)| AccountPnl {
                account: account.to_string(),
                classification: classification.to_string(),
                closed_pnl,
            })
            .collect();

        aggregates
    }

    /// Classification labels present, ascending.
    pub fn classifications(&self) -> impl Iterator<Item = &str> {
        self.trade_counts.keys().map(String::as_str)
    }

    pub fn trade_count(&self, classification: &str) -> usize {
        self.trade_counts.get(classification).copied().unwrap_or(0)
    }

    /// Side counts for a classification, zero when it has no trades.
    pub fn sides(&self, classification: &str) -> SideCounts {
        self.side_counts
            .get(classification)
            .cloned()
            .unwrap_or_default()
    }

    /// Accounts ranked by summed PnL within a classification, best first.
    ///
    /// Equal sums are ordered by account name.
    pub fn top_accounts(&self, classification: &str, n: usize) -> Vec<AccountPnl> {
        let mut ranked: Vec<AccountPnl> = self
            .account_pnl
            .iter()
            .filter(|a| a.classification == classification)
            .cloned()
            .collect();
        ranked.sort_by(|a, b| {
            b.closed_pnl
                .cmp(&a.closed_pnl)
                .then_with(|| a.account.cmp(&b.account))
        });
        ranked.truncate(n);
        ranked
    }
}
