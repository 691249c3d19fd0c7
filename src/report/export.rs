//! Merged table export: every trade column followed by `date` and `classification`.

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::data::Table;
use crate::error::PipelineError;
use crate::models::JoinedRecord;

pub const DATE_COLUMN: &str = "date";
pub const CLASSIFICATION_COLUMN: &str = "classification";

/// Render matched trades as UTF-8 CSV with a header row and no index column.
///
/// Trade cells are copied verbatim in trade-log order. A trade column already
/// named `date` or `classification` is overwritten in place.
pub fn merged_csv(trades: &Table, records: &[JoinedRecord]) -> crate::error::Result<Vec<u8>> {
    let mut headers: Vec<&str> = trades.headers().iter().collect();
    let date_idx = position_or_push(&mut headers, DATE_COLUMN);
    let class_idx = position_or_push(&mut headers, CLASSIFICATION_COLUMN);

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;

    for record in records {
        let source = &trades.rows()[record.trade.row];
        let mut cells: Vec<String> = source.iter().map(str::to_string).collect();
        cells.resize(headers.len(), String::new());
        cells[date_idx] = record.trade.date.format("%Y-%m-%d").to_string();
        cells[class_idx] = record.classification.clone();
        writer.write_record(&cells)?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Export(e.into_error().into()))
}

/// Write export bytes to disk.
pub fn write_to(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write merged export: {:?}", path))
}

fn position_or_push<'a>(headers: &mut Vec<&'a str>, column: &'a str) -> usize {
    match headers.iter().position(|h| *h == column) {
        Some(idx) => idx,
        None => {
            headers.push(column);
            headers.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeRecord;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const TRADES: &str = "Account,Side,Timestamp IST,Start Position,Closed PnL\n\
        A,BUY,01-01-2024 10:00,5,100.0\n\
        B,SELL,03-01-2024 09:00,2,20\n";

    fn joined(row: usize, label: &str) -> JoinedRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        JoinedRecord::new(
            TradeRecord::new(row, "A".to_string(), ts, "BUY".to_string(), dec!(100), 5.0),
            label.to_string(),
        )
    }

    #[test]
    fn test_export_appends_date_and_classification() {
        let table = Table::from_reader("trades", TRADES.as_bytes()).unwrap();
        let bytes = merged_csv(&table, &[joined(0, "Fear")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Account,Side,Timestamp IST,Start Position,Closed PnL,date,classification\n\
             A,BUY,01-01-2024 10:00,5,100.0,2024-01-01,Fear\n"
        );
    }

    #[test]
    fn test_existing_date_column_overwritten() {
        let data = "date,Account\nstale,A\n";
        let table = Table::from_reader("trades", data.as_bytes()).unwrap();
        let bytes = merged_csv(&table, &[joined(0, "Greed")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text, "date,Account,classification\n2024-01-01,A,Greed\n");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged_trader_sentiment.csv");

        write_to(&path, b"a,b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }
}
