//! Text rendering of a report for the terminal.

use std::fmt;

use crate::metrics::round_pnl;

use super::charts::{BoxSeries, ChartSet, ViolinSeries};
use super::Report;

const DENSITY_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const LABEL_WIDTH: usize = 14;

/// A report bound to a chart width, printable with `{}`.
pub struct Dashboard<'a> {
    report: &'a Report,
    width: usize,
}

impl<'a> Dashboard<'a> {
    pub fn new(report: &'a Report, width: usize) -> Self {
        Self { report, width }
    }
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let rule = LABEL_WIDTH + self.width + 2;

        writeln!(f, "\n{:=^rule$}", " MARKET SENTIMENT VS TRADER PERFORMANCE ")?;
        writeln!(f)?;
        write!(f, "{}", report.summary)?;

        writeln!(f, "\n--- PnL by Sentiment ---")?;
        draw_box_plot(f, &report.charts, self.width)?;

        writeln!(f, "\n--- Leverage (Start Position) by Sentiment ---")?;
        for series in &report.charts.leverage_violin {
            draw_violin(f, series)?;
        }

        writeln!(f, "\n--- Trade Side Distribution ---")?;
        draw_side_bars(f, &report.charts, self.width)?;

        writeln!(f, "\n--- Sentiment Summary ---")?;
        writeln!(
            f,
            "{:<lw$} {:>7} {:>12} {:>14} {:>6} {:>10} {:>6} {:>6}",
            "CLASS", "TRADES", "AVG PNL", "TOTAL PNL", "WIN%", "AVG POS", "BUY", "SELL",
            lw = LABEL_WIDTH
        )?;
        writeln!(f, "{}", "-".repeat(LABEL_WIDTH + 70))?;
        for class in &report.classes {
            writeln!(
                f,
                "{:<lw$} {:>7} {:>12.2} {:>14.2} {:>5.1}% {:>10.2} {:>6} {:>6}",
                truncate(&class.classification, LABEL_WIDTH),
                class.trades,
                round_pnl(class.avg_pnl),
                round_pnl(class.total_pnl),
                class.win_rate * 100.0,
                class.avg_start_position,
                class.buy,
                class.sell,
                lw = LABEL_WIDTH
            )?;
        }

        writeln!(f, "\n--- Insights for Smarter Strategies ---")?;
        for insight in &report.insights.messages {
            writeln!(f, "{}", insight)?;
        }

        writeln!(f, "\n--- Top Performing Accounts by Sentiment ---")?;
        for table in &report.insights.rankings {
            writeln!(f, "\n{} Days", table.classification)?;
            if table.accounts.is_empty() {
                writeln!(f, "  (no trades)")?;
                continue;
            }
            writeln!(f, "  {:<4} {:<44} {:>14}", "#", "ACCOUNT", "CLOSED PNL")?;
            for (rank, entry) in table.accounts.iter().enumerate() {
                writeln!(
                    f,
                    "  {:<4} {:<44} {:>14.2}",
                    rank + 1,
                    truncate(&entry.account, 44),
                    round_pnl(entry.closed_pnl)
                )?;
            }
        }

        writeln!(f, "\n{:=^rule$}", "")?;
        Ok(())
    }
}

fn draw_box_plot(f: &mut fmt::Formatter<'_>, charts: &ChartSet, width: usize) -> fmt::Result {
    let Some((lo, hi)) = charts.pnl_range() else {
        return writeln!(f, "(no data)");
    };

    for series in &charts.pnl_box {
        writeln!(
            f,
            "{:<lw$}{}",
            truncate(&series.classification, LABEL_WIDTH),
            box_line(series, lo, hi, width),
            lw = LABEL_WIDTH
        )?;
    }
    writeln!(
        f,
        "{:<lw$}{:<half$.2}{:>rest$.2}",
        "",
        lo,
        hi,
        lw = LABEL_WIDTH,
        half = width / 2,
        rest = width - width / 2
    )?;
    for series in &charts.pnl_box {
        let s = &series.stats;
        writeln!(
            f,
            "  {}: median {:.2}, IQR [{:.2}, {:.2}], whiskers [{:.2}, {:.2}], {} outliers",
            series.classification,
            s.median,
            s.q1,
            s.q3,
            s.lower_whisker,
            s.upper_whisker,
            s.outliers.len()
        )?;
    }
    Ok(())
}

fn box_line(series: &BoxSeries, lo: f64, hi: f64, width: usize) -> String {
    let s = &series.stats;
    let col = |v: f64| scale(v, lo, hi, width);
    let mut cells = vec![' '; width];

    let (lw, q1, med, q3, uw) = (
        col(s.lower_whisker),
        col(s.q1),
        col(s.median),
        col(s.q3),
        col(s.upper_whisker),
    );
    for cell in &mut cells[lw..=uw] {
        *cell = '─';
    }
    for cell in &mut cells[q1..=q3] {
        *cell = '█';
    }
    cells[lw] = '├';
    cells[uw] = '┤';
    cells[med] = '┃';
    for outlier in &s.outliers {
        cells[col(*outlier)] = '•';
    }

    cells.into_iter().collect()
}

fn draw_violin(f: &mut fmt::Formatter<'_>, series: &ViolinSeries) -> fmt::Result {
    let peak = series.density.peak();
    let profile: String = series
        .density
        .points
        .iter()
        .map(|(_, d)| {
            let level = if peak > 0.0 {
                (d / peak * (DENSITY_LEVELS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            DENSITY_LEVELS[level.min(DENSITY_LEVELS.len() - 1)]
        })
        .collect();

    let first = series.density.points.first().map_or(0.0, |p| p.0);
    let last = series.density.points.last().map_or(0.0, |p| p.0);

    writeln!(
        f,
        "{:<lw$}{}",
        truncate(&series.classification, LABEL_WIDTH),
        profile,
        lw = LABEL_WIDTH
    )?;
    writeln!(
        f,
        "{:<lw$}range [{:.2}, {:.2}]  quartiles {:.2} / {:.2} / {:.2}  bw {:.3}",
        "",
        first,
        last,
        series.q25,
        series.median,
        series.q75,
        series.density.bandwidth,
        lw = LABEL_WIDTH
    )
}

fn draw_side_bars(f: &mut fmt::Formatter<'_>, charts: &ChartSet, width: usize) -> fmt::Result {
    let max = charts.max_side_count();
    if charts.side_bars.is_empty() {
        return writeln!(f, "(no data)");
    }

    for group in &charts.side_bars {
        writeln!(f, "{}", group.classification)?;
        for side in &charts.sides {
            let count = group.counts.get(side);
            writeln!(
                f,
                "  {:<lw$}{} {}",
                truncate(side, LABEL_WIDTH - 3),
                "█".repeat(bar_len(count, max, width)),
                count,
                lw = LABEL_WIDTH - 2
            )?;
        }
    }
    Ok(())
}

/// Column of `value` on a `width`-wide axis spanning `lo..=hi`.
fn scale(value: f64, lo: f64, hi: f64, width: usize) -> usize {
    if hi <= lo {
        return width / 2;
    }
    let frac = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    (frac * (width - 1) as f64).round() as usize
}

fn bar_len(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    ((count * width) as f64 / max as f64).round().max(1.0) as usize
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
