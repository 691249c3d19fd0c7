//! Comparative insights between two sentiment classifications.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::error::{PipelineError, Result};
use crate::models::TradeSide;

use super::aggregator::{round_pnl, AccountPnl, Aggregates};

/// How an insight is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Headline finding
    Success,
    /// Cautionary note
    Info,
    /// Suggested course of action
    Strategy,
    /// Plain reported figure
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            InsightKind::Success => "[+]",
            InsightKind::Info => "[!]",
            InsightKind::Strategy => "[>]",
            InsightKind::Note => "[-]",
        };
        write!(f, "{} {}", marker, self.message)
    }
}

/// Top accounts by summed PnL within one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTable {
    pub classification: String,
    pub accounts: Vec<AccountPnl>,
}

/// Messages and ranked tables derived from the aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub messages: Vec<Insight>,
    pub rankings: Vec<RankedTable>,
}

impl Insights {
    /// Compare the configured primary classification against the baseline.
    ///
    /// Both labels must be present in the joined data; a missing one aborts
    /// with `MissingClassification`.
    pub fn compute(aggregates: &Aggregates, config: &DashboardConfig) -> Result<Self> {
        let primary = config.primary_label.as_str();
        let baseline = config.baseline_label.as_str();

        let mean_pnl = |label: &str| -> Result<Decimal> {
            aggregates
                .avg_pnl
                .get(label)
                .copied()
                .ok_or_else(|| PipelineError::MissingClassification(label.to_string()))
        };
        let mean_leverage = |label: &str| -> Result<f64> {
            aggregates
                .leverage_stats
                .get(label)
                .map(|s| s.mean)
                .ok_or_else(|| PipelineError::MissingClassification(label.to_string()))
        };

        let (primary_pnl, baseline_pnl) = (mean_pnl(primary)?, mean_pnl(baseline)?);
        let (primary_lev, baseline_lev) = (mean_leverage(primary)?, mean_leverage(baseline)?);

        let mut messages = Vec::with_capacity(6);

        if primary_pnl > baseline_pnl {
            messages.push(Insight::new(
                InsightKind::Success,
                format!(
                    "Higher PnL on {} days: {:.2} vs {}: {:.2}",
                    primary,
                    round_pnl(primary_pnl),
                    baseline,
                    round_pnl(baseline_pnl)
                ),
            ));
            messages.push(Insight::new(
                InsightKind::Strategy,
                format!(
                    "Strategy: Consider more aggressive long positions on {} days.",
                    primary
                ),
            ));
        } else {
            messages.push(Insight::new(
                InsightKind::Success,
                format!(
                    "Higher PnL on {} days: {:.2} vs {}: {:.2}",
                    baseline,
                    round_pnl(baseline_pnl),
                    primary,
                    round_pnl(primary_pnl)
                ),
            ));
            messages.push(Insight::new(
                InsightKind::Strategy,
                format!(
                    "Strategy: Consider contrarian or defensive strategies on {} days.",
                    primary
                ),
            ));
        }

        if primary_lev > baseline_lev {
            messages.push(Insight::new(
                InsightKind::Info,
                format!(
                    "Traders use higher leverage on {} days. Caution recommended to avoid large losses.",
                    primary
                ),
            ));
        } else {
            messages.push(Insight::new(
                InsightKind::Info,
                format!(
                    "Higher leverage observed on {} days. May indicate panic trading; caution advised.",
                    baseline
                ),
            ));
        }

        for label in [primary, baseline] {
            let sides = aggregates.sides(label);
            messages.push(Insight::new(
                InsightKind::Note,
                format!(
                    "{} Days — {}: {}, {}: {}",
                    label,
                    TradeSide::Buy,
                    sides.get(TradeSide::Buy.as_str()),
                    TradeSide::Sell,
                    sides.get(TradeSide::Sell.as_str())
                ),
            ));
        }

        let rankings = [baseline, primary]
            .into_iter()
            .map(|label| RankedTable {
                classification: label.to_string(),
                accounts: aggregates.top_accounts(label, config.top_accounts),
            })
            .collect();

        Ok(Self { messages, rankings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::stats::DescriptiveStats;
    use rust_decimal_macros::dec;

    fn aggregates(greed_pnl: Decimal, fear_pnl: Decimal, greed_lev: f64, fear_lev: f64) -> Aggregates {
        let mut agg = Aggregates::default();
        agg.avg_pnl.insert("Greed".to_string(), greed_pnl);
        agg.avg_pnl.insert("Fear".to_string(), fear_pnl);
        agg.leverage_stats.insert(
            "Greed".to_string(),
            DescriptiveStats::from_values(&[greed_lev]).unwrap(),
        );
        agg.leverage_stats.insert(
            "Fear".to_string(),
            DescriptiveStats::from_values(&[fear_lev]).unwrap(),
        );
        agg
    }

    fn messages(insights: &Insights) -> Vec<&str> {
        insights.messages.iter().map(|m| m.message.as_str()).collect()
    }

    #[test]
    fn test_greed_higher_pnl_formats_two_decimals() {
        let agg = aggregates(dec!(10.0), dec!(5.0), 1.0, 2.0);
        let insights = Insights::compute(&agg, &DashboardConfig::default()).unwrap();
        let msgs = messages(&insights);

        assert_eq!(msgs[0], "Higher PnL on Greed days: 10.00 vs Fear: 5.00");
        assert_eq!(
            msgs[1],
            "Strategy: Consider more aggressive long positions on Greed days."
        );
        assert_eq!(insights.messages[0].kind, InsightKind::Success);
    }

    #[test]
    fn test_means_rounded_not_truncated() {
        let agg = aggregates(dec!(0.005), dec!(2) / dec!(3), 1.0, 1.0);
        let insights = Insights::compute(&agg, &DashboardConfig::default()).unwrap();

        assert_eq!(
            insights.messages[0].message,
            "Higher PnL on Fear days: 0.67 vs Greed: 0.01"
        );
    }

    #[test]
    fn test_tie_goes_to_fear_branch() {
        let agg = aggregates(dec!(3), dec!(3), 2.0, 2.0);
        let insights = Insights::compute(&agg, &DashboardConfig::default()).unwrap();
        let msgs = messages(&insights);

        assert_eq!(msgs[0], "Higher PnL on Fear days: 3.00 vs Greed: 3.00");
        assert_eq!(
            msgs[1],
            "Strategy: Consider contrarian or defensive strategies on Greed days."
        );
        assert_eq!(
            msgs[2],
            "Higher leverage observed on Fear days. May indicate panic trading; caution advised."
        );
    }

    #[test]
    fn test_greed_higher_leverage() {
        let agg = aggregates(dec!(1), dec!(2), 9.0, 3.0);
        let insights = Insights::compute(&agg, &DashboardConfig::default()).unwrap();
        assert_eq!(
            insights.messages[2].message,
            "Traders use higher leverage on Greed days. Caution recommended to avoid large losses."
        );
    }

    #[test]
    fn test_side_counts_default_to_zero() {
        let agg = aggregates(dec!(1), dec!(2), 1.0, 1.0);
        let insights = Insights::compute(&agg, &DashboardConfig::default()).unwrap();
        let msgs = messages(&insights);

        assert_eq!(msgs[3], "Greed Days — BUY: 0, SELL: 0");
        assert_eq!(msgs[4], "Fear Days — BUY: 0, SELL: 0");
    }

    #[test]
    fn test_missing_classification_is_error() {
        let mut agg = aggregates(dec!(1), dec!(2), 1.0, 1.0);
        agg.avg_pnl.remove("Fear");

        let err = Insights::compute(&agg, &DashboardConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingClassification(ref l) if l == "Fear"));
    }

    #[test]
    fn test_rankings_fear_then_greed() {
        let agg = aggregates(dec!(1), dec!(2), 1.0, 1.0);
        let insights = Insights::compute(&agg, &DashboardConfig::default()).unwrap();
        let order: Vec<&str> = insights
            .rankings
            .iter()
            .map(|r| r.classification.as_str())
            .collect();
        assert_eq!(order, vec!["Fear", "Greed"]);
    }

    #[test]
    fn test_configured_labels() {
        let mut agg = Aggregates::default();
        agg.avg_pnl.insert("Extreme Greed".to_string(), dec!(7.5));
        agg.avg_pnl.insert("Neutral".to_string(), dec!(1));
        for label in ["Extreme Greed", "Neutral"] {
            agg.leverage_stats.insert(
                label.to_string(),
                DescriptiveStats::from_values(&[1.0]).unwrap(),
            );
        }
        let config = DashboardConfig {
            primary_label: "Extreme Greed".to_string(),
            baseline_label: "Neutral".to_string(),
            ..Default::default()
        };

        let insights = Insights::compute(&agg, &config).unwrap();
        assert_eq!(
            insights.messages[0].message,
            "Higher PnL on Extreme Greed days: 7.50 vs Neutral: 1.00"
        );
    }

    #[test]
    fn test_display_marks_kind() {
        let insight = Insight::new(InsightKind::Info, "careful".to_string());
        assert_eq!(insight.to_string(), "[!] careful");
    }
}
