//! Yahoo v8 chart API payload → raw per-day rows.

use anyhow::{Result, bail};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

// ── Raw rows ──────────────────────────────────────────────────────────────────

/// One column-aligned slot of the payload, nulls preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChartRow {
    pub timestamp: i64,
    pub gmtoffset: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
}

impl ProviderError {
    fn message(&self) -> &str {
        if self.description.is_empty() {
            &self.code
        } else {
            &self.description
        }
    }
}

/// Decide a chart response from its status and body. A provider error object
/// wins over the HTTP status; Yahoo answers unknown symbols with a 404 that
/// carries one.
pub fn rows_from_response(status: StatusCode, body: &str) -> Result<Vec<RawChartRow>> {
    let envelope = match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => bail!("Unexpected chart payload: {}", e),
        Err(e) => {
            debug!("HTTP {} body not usable: {}", status, e);
            bail!("HTTP {}", status);
        }
    };

    if let Some(err) = envelope.chart.error {
        bail!("{}", err.message());
    }
    if !status.is_success() {
        bail!("HTTP {}", status);
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(vec![]);
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .unwrap_or_default()
        .adjclose;

    let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();

    let rows = result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, &ts)| RawChartRow {
            timestamp: ts,
            gmtoffset: result.meta.gmtoffset,
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            adj_close: at(&adj, i),
        })
        .collect();

    Ok(rows)
}
