pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::ProviderConfig;
use crate::error::ChartError;
use crate::models::{DailyRecord, Period, TimeSeries, normalise_symbol};
use crate::utils::Timer;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use self::cleaner::clean_chart_rows;
use self::http_client::HttpClient;
use self::parsers::rows_from_response;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable market data source.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_daily(&self, symbol: &str, period: Period) -> Result<Vec<DailyRecord>>;
}

// ── Yahoo chart API ───────────────────────────────────────────────────────────

pub struct YahooChartSource {
    client: HttpClient,
    base_url: String,
}

impl YahooChartSource {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// e.g. AAPL, 1y → /v8/finance/chart/AAPL?range=1y&interval=1d&…
    /// The symbol is a single percent-encoded path segment.
    fn chart_url(&self, symbol: &str, period: Period) -> Result<url::Url> {
        let base = format!("{}/v8/finance/chart", self.base_url);
        let mut url = url::Url::parse(&base).with_context(|| format!("Invalid chart URL {}", base))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} cannot carry a path", self.base_url))?
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", period.token())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true")
            .append_pair("events", "div,splits");

        Ok(url)
    }
}

#[async_trait]
impl MarketDataSource for YahooChartSource {
    async fn fetch_daily(&self, symbol: &str, period: Period) -> Result<Vec<DailyRecord>> {
        let url = self.chart_url(symbol, period)?;

        let resp = self.client.get_text(&url).await?;
        let rows = rows_from_response(resp.status, &resp.body)?;

        let records = clean_chart_rows(symbol, rows);
        debug!("{}: {} daily records", symbol, records.len());
        Ok(records)
    }
}

// ── Fetch boundary ────────────────────────────────────────────────────────────

/// Fetch one ticker's daily series. Single shot; any failure, including an
/// empty result, becomes `DataUnavailable`.
pub async fn fetch(
    source: &dyn MarketDataSource,
    ticker: &str,
    period: Period,
) -> Result<TimeSeries, ChartError> {
    let symbol = normalise_symbol(ticker);
    if symbol.is_empty() {
        return Err(ChartError::validation("Please enter a stock ticker."));
    }

    info!("Fetching {} stock data for the last {}...", symbol, period);
    let _t = Timer::start(format!("fetch {} ({})", symbol, period));

    let records = source.fetch_daily(&symbol, period).await.map_err(|e| {
        warn!("{}: fetch failed: {:#}", symbol, e);
        ChartError::unavailable(&symbol, format!("{:#}", e))
    })?;

    if records.is_empty() {
        return Err(ChartError::unavailable(
            &symbol,
            "No data found for the given ticker.",
        ));
    }

    let series = TimeSeries::new(symbol.clone(), records)
        .map_err(|e| ChartError::unavailable(&symbol, e))?;

    info!("Data fetching complete! {} records for {}", series.len(), symbol);
    Ok(series)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;

    #[test]
    fn test_fetch_normalises_symbol() {
        let src = ScriptedSource::default().with("AAPL", &[1.0, 2.0, 3.0]);
        let series = tokio_test::block_on(fetch(&src, " aapl ", Period::OneYear)).unwrap();
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(src.calls.lock().unwrap()[0], ("AAPL".to_string(), Period::OneYear));
    }

    #[test]
    fn test_fetch_unknown_ticker_is_unavailable() {
        let src = ScriptedSource::default();
        let err = tokio_test::block_on(fetch(&src, "ZZZZ", Period::OneYear)).unwrap_err();
        match err {
            ChartError::DataUnavailable { ticker, cause } => {
                assert_eq!(ticker, "ZZZZ");
                assert!(cause.contains("delisted"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fetch_empty_result_is_unavailable() {
        let src = ScriptedSource::default().with("EMPTY", &[]);
        let err = tokio_test::block_on(fetch(&src, "EMPTY", Period::OneYear)).unwrap_err();
        assert_eq!(
            err,
            ChartError::unavailable("EMPTY", "No data found for the given ticker.")
        );
    }

    #[test]
    fn test_fetch_blank_ticker_never_calls_source() {
        let src = ScriptedSource::default();
        let err = tokio_test::block_on(fetch(&src, "   ", Period::OneYear)).unwrap_err();
        assert!(matches!(err, ChartError::Validation(_)));
        assert_eq!(src.call_count(), 0);
    }

    #[test]
    fn test_chart_url() {
        let src = YahooChartSource::new(&ProviderConfig::default()).unwrap();
        let url = src.chart_url("MSFT", Period::SixMonths).unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/MSFT");
        let q: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(q.contains(&("range".into(), "6mo".into())));
        assert!(q.contains(&("interval".into(), "1d".into())));
    }

    #[test]
    fn test_chart_url_keeps_symbol_in_one_segment() {
        let src = YahooChartSource::new(&ProviderConfig::default()).unwrap();

        let url = src.chart_url("MSFT/../AAPL", Period::OneYear).unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/MSFT%2F..%2FAAPL");

        let url = src.chart_url("BRK/B", Period::OneYear).unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 4);

        let url = src.chart_url("X?RANGE=MAX#", Period::OneYear).unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/X%3FRANGE=MAX%23");
        assert_eq!(url.fragment(), None);
        let ranges: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k.eq_ignore_ascii_case("range"))
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(ranges, vec!["1y".to_string()]);
    }
}
