use crate::error::ChartError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

// ── Daily record ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
}

// ── Time series ───────────────────────────────────────────────────────────────

/// Daily records for one ticker. Never empty, dates strictly ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    ticker: String,
    records: Vec<DailyRecord>,
}

impl TimeSeries {
    pub fn new(ticker: impl Into<String>, records: Vec<DailyRecord>) -> Result<Self, ChartError> {
        let ticker = ticker.into();
        if records.is_empty() {
            return Err(ChartError::MalformedSeries(format!("{}: empty series", ticker)));
        }
        if let Some(w) = records.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(ChartError::MalformedSeries(format!(
                "{}: dates out of order at {} → {}",
                ticker, w[0].date, w[1].date
            )));
        }
        Ok(Self { ticker, records })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn adj_close(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.adj_close).collect()
    }
}

// ── Chart kind ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Candlestick,
    HistoricalPrice,
    DailyReturns,
    MovingAverage,
    Comparison,
}

impl ChartKind {
    /// Kinds offered by the selector; comparison has its own action.
    pub const SELECTABLE: [ChartKind; 4] = [
        ChartKind::Candlestick,
        ChartKind::HistoricalPrice,
        ChartKind::DailyReturns,
        ChartKind::MovingAverage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Candlestick => "Candlestick Chart",
            ChartKind::HistoricalPrice => "Historical Price",
            ChartKind::DailyReturns => "Daily Returns",
            ChartKind::MovingAverage => "Moving Average",
            ChartKind::Comparison => "Comparison",
        }
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::SELECTABLE
            .into_iter()
            .find(|k| k.label() == s)
            .ok_or_else(|| ChartError::UnsupportedChartKind(s.to_string()))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Lookback period ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Period {
    /// Range token understood by the provider.
    pub fn token(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }
}

impl FromStr for Period {
    type Err = String;

    /// Accepts provider tokens ("1y") and spelled-out forms ("1 year").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let period = match norm.as_str() {
            "1mo" | "1month" => Period::OneMonth,
            "3mo" | "3months" => Period::ThreeMonths,
            "6mo" | "6months" => Period::SixMonths,
            "1y" | "1year" => Period::OneYear,
            "2y" | "2years" => Period::TwoYears,
            "5y" | "5years" => Period::FiveYears,
            "10y" | "10years" => Period::TenYears,
            "ytd" | "yeartodate" => Period::YearToDate,
            "max" => Period::Max,
            _ => return Err(format!("Unknown period {:?}", s)),
        };
        Ok(period)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ── Chart request ─────────────────────────────────────────────────────────────

/// One validated user action, built from a form snapshot and consumed at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub ticker: String,
    pub period: Period,
    /// Raw selector value; resolved to a `ChartKind` after the fetch.
    pub kind: String,
    pub secondary_ticker: Option<String>,
}

pub fn normalise_symbol(s: &str) -> String {
    s.trim().to_uppercase()
}
