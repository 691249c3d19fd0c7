//! Chart data: the numbers behind each dashboard panel, independent of drawing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::metrics::{Aggregates, BoxStats, Density, DescriptiveStats, SideCounts};

/// Bandwidths the violin density extends past the observed range.
const VIOLIN_CUT: f64 = 2.0;

/// One box of the PnL box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSeries {
    pub classification: String,
    pub stats: BoxStats,
}

/// One violin of the start-position violin plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinSeries {
    pub classification: String,
    pub density: Density,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
}

/// One group of the side-distribution bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGroup {
    pub classification: String,
    pub counts: SideCounts,
}

/// Data for the three chart panels, ordered by classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    /// Classification x closed PnL
    pub pnl_box: Vec<BoxSeries>,

    /// Classification x start position
    pub leverage_violin: Vec<ViolinSeries>,

    /// Classification x side counts
    pub side_bars: Vec<BarGroup>,

    /// Every side label present in any group, ascending
    pub sides: Vec<String>,
}

impl ChartSet {
    pub fn build(aggregates: &Aggregates, density_points: usize) -> Self {
        let pnl_box = aggregates
            .pnl_values
            .iter()
            .filter_map(|(label, values)| {
                BoxStats::from_values(values).map(|stats| BoxSeries {
                    classification: label.clone(),
                    stats,
                })
            })
            .collect();

        let leverage_violin = aggregates
            .position_values
            .iter()
            .filter_map(|(label, values)| {
                let density = Density::estimate(values, density_points, VIOLIN_CUT)?;
                let stats = DescriptiveStats::from_values(values)?;
                Some(ViolinSeries {
                    classification: label.clone(),
                    density,
                    q25: stats.q25,
                    median: stats.median,
                    q75: stats.q75,
                })
            })
            .collect();

        let side_bars = aggregates
            .side_counts
            .iter()
            .map(|(label, counts)| BarGroup {
                classification: label.clone(),
                counts: counts.clone(),
            })
            .collect();

        let sides = aggregates
            .side_counts
            .values()
            .flat_map(|counts| counts.labels())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            pnl_box,
            leverage_violin,
            side_bars,
            sides,
        }
    }

    /// Shared value range of the box plot panel.
    pub fn pnl_range(&self) -> Option<(f64, f64)> {
        self.pnl_box
            .iter()
            .map(|b| b.stats.extent())
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }

    /// Largest bar in the side-distribution panel.
    pub fn max_side_count(&self) -> usize {
        self.side_bars
            .iter()
            .map(|g| g.counts.max())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JoinedRecord, TradeRecord};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn records() -> Vec<JoinedRecord> {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        [
            ("Fear", "BUY", -10, 1.0),
            ("Fear", "BUY", 20, 3.0),
            ("Greed", "SELL", 40, 8.0),
            ("Greed", "SHORT", 30, 8.0),
        ]
        .into_iter()
        .enumerate()
        .map(|(row, (label, side, pnl, pos))| {
            JoinedRecord::new(
                TradeRecord::new(row, "A".to_string(), ts, side.to_string(), Decimal::from(pnl), pos),
                label.to_string(),
            )
        })
        .collect()
    }

    #[test]
    fn test_one_series_per_classification() {
        let charts = ChartSet::build(&Aggregates::compute(&records()), 16);

        assert_eq!(charts.pnl_box.len(), 2);
        assert_eq!(charts.leverage_violin.len(), 2);
        assert_eq!(charts.side_bars.len(), 2);
        assert_eq!(charts.side_bars[0].classification, "Fear");
        assert_eq!(charts.side_bars[0].counts.get("BUY"), 2);
        assert_eq!(charts.side_bars[1].counts.get("SHORT"), 1);
        assert_eq!(charts.sides, vec!["BUY", "SELL", "SHORT"]);

        assert_eq!(charts.leverage_violin[0].density.points.len(), 16);
        // identical observations collapse to a point
        assert_eq!(charts.leverage_violin[1].density.points, vec![(8.0, 1.0)]);
    }

    #[test]
    fn test_ranges() {
        let charts = ChartSet::build(&Aggregates::compute(&records()), 16);
        assert_eq!(charts.pnl_range(), Some((-10.0, 40.0)));
        assert_eq!(charts.max_side_count(), 2);
    }
}
