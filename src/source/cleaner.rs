use super::parsers::RawChartRow;
use crate::models::DailyRecord;
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

/// Exchange-local trading date for a UTC timestamp.
pub fn trading_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

// ── Raw row → DailyRecord ─────────────────────────────────────────────────────

pub fn row_to_record(symbol: &str, row: &RawChartRow) -> Option<DailyRecord> {
    let date = trading_date(row.timestamp, row.gmtoffset)?;

    let Some(close) = positive(row.close) else {
        warn!("{}: dropping {} (no close)", symbol, date);
        return None;
    };

    Some(DailyRecord {
        date,
        open: positive(row.open).unwrap_or(close),
        high: positive(row.high).unwrap_or(close),
        low: positive(row.low).unwrap_or(close),
        close,
        adj_close: positive(row.adj_close).unwrap_or(close),
    })
}

/// Clean rows into ascending, de-duplicated daily records.
/// On a repeated date the later row wins.
pub fn clean_chart_rows(symbol: &str, rows: Vec<RawChartRow>) -> Vec<DailyRecord> {
    let mut by_date: BTreeMap<NaiveDate, DailyRecord> = BTreeMap::new();
    for row in &rows {
        if let Some(rec) = row_to_record(symbol, row) {
            by_date.insert(rec.date, rec);
        }
    }
    by_date.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: i64, close: Option<f64>) -> RawChartRow {
        RawChartRow {
            timestamp: ts,
            gmtoffset: -14400,
            open: Some(1.0),
            high: None,
            low: Some(0.5),
            close,
            adj_close: close.map(|c| c * 0.99),
        }
    }

    #[test]
    fn test_trading_date_uses_offset() {
        // 2024-01-02 14:30 UTC is still Jan 2 in New York
        assert_eq!(
            trading_date(1704205800, -14400),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        // 02:00 UTC on Jan 3 is Jan 2 at UTC-5
        assert_eq!(
            trading_date(1704247200, -18000),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_clean_sorts_dedupes_and_drops_nulls() {
        let rows = vec![
            raw(1704292200, Some(184.25)),
            raw(1704205800, Some(185.64)),
            raw(1704378600, None),
            raw(1704292300, Some(184.30)),
        ];
        let recs = clean_chart_rows("AAPL", rows);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].date < recs[1].date);
        assert_eq!(recs[1].close, 184.30);
        assert_eq!(recs[0].high, 185.64);
    }

    #[test]
    fn test_adj_close_falls_back_to_close() {
        let mut r = raw(1704205800, Some(10.0));
        r.adj_close = None;
        assert_eq!(row_to_record("X", &r).unwrap().adj_close, 10.0);
    }
}
