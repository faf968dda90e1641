//! Chart builders: time series in, standalone HTML document out.

pub mod analytics;
pub mod figure;

use crate::error::ChartError;
use crate::models::{ChartKind, TimeSeries};
use crate::utils::escape_html;
use tracing::debug;

use self::analytics::{MOVING_AVERAGE_WINDOW, daily_returns, moving_average, normalize};
use self::figure::{Figure, Trace};

// ── Document ──────────────────────────────────────────────────────────────────

/// A rendered chart: the figure plus a self-contained HTML page that loads
/// plotly.js from `script_url` and draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDocument {
    pub title: String,
    pub figure: Figure,
    html: String,
}

impl ChartDocument {
    fn render(figure: Figure, script_url: &str) -> Result<Self, ChartError> {
        let title = figure.title().to_string();
        let data = to_script_json(&figure.data)?;
        let layout = to_script_json(&figure.layout)?;

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{src}"></script>
</head>
<body style="margin:0">
<div id="chart" style="width:100vw;height:100vh"></div>
<script>Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});</script>
</body>
</html>
"#,
            title = escape_html(&title),
            src = escape_html(script_url),
        );

        Ok(Self { title, figure, html })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn trace_count(&self) -> usize {
        self.figure.data.len()
    }
}

/// JSON safe to inline inside a `<script>` element.
fn to_script_json<T: serde::Serialize>(value: &T) -> Result<String, ChartError> {
    let json = serde_json::to_string(value).map_err(|e| ChartError::RenderFailure(e.to_string()))?;
    Ok(json.replace('<', "\\u003c"))
}

// ── Builder ───────────────────────────────────────────────────────────────────

pub struct ChartBuilder {
    script_url: String,
}

impl ChartBuilder {
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
        }
    }

    /// Dispatch for the selector-driven single-ticker path.
    pub fn build(&self, kind: ChartKind, series: &TimeSeries) -> Result<ChartDocument, ChartError> {
        debug!("Building {} for {} ({} records)", kind, series.ticker(), series.len());
        match kind {
            ChartKind::Candlestick => self.candlestick(series),
            ChartKind::HistoricalPrice => self.historical_price(series),
            ChartKind::DailyReturns => self.daily_returns(series),
            ChartKind::MovingAverage => self.moving_average(series),
            ChartKind::Comparison => Err(ChartError::UnsupportedChartKind(kind.label().to_string())),
        }
    }

    pub fn candlestick(&self, series: &TimeSeries) -> Result<ChartDocument, ChartError> {
        let recs = series.records();
        let trace = Trace::Candlestick {
            x: series.dates(),
            open: recs.iter().map(|r| r.open).collect(),
            high: recs.iter().map(|r| r.high).collect(),
            low: recs.iter().map(|r| r.low).collect(),
            close: recs.iter().map(|r| r.close).collect(),
            name: None,
        };
        self.finish(Figure::new("Candlestick Chart").with_trace(trace))
    }

    pub fn historical_price(&self, series: &TimeSeries) -> Result<ChartDocument, ChartError> {
        let y = series.adj_close().into_iter().map(Some).collect();
        self.finish(Figure::new("Historical Stock Prices").with_trace(Trace::line(series.dates(), y, None)))
    }

    pub fn daily_returns(&self, series: &TimeSeries) -> Result<ChartDocument, ChartError> {
        let y = daily_returns(&series.adj_close());
        self.finish(Figure::new("Daily Returns").with_trace(Trace::line(series.dates(), y, None)))
    }

    /// Price plus 50-sample SMA. Shorter series still render; the SMA trace is all gaps.
    pub fn moving_average(&self, series: &TimeSeries) -> Result<ChartDocument, ChartError> {
        let prices = series.adj_close();
        let sma = moving_average(&prices, MOVING_AVERAGE_WINDOW);
        let dates = series.dates();

        let fig = Figure::new("Stock Price with Moving Average")
            .with_trace(Trace::line(
                dates.clone(),
                prices.into_iter().map(Some).collect(),
                Some("Stock Price"),
            ))
            .with_trace(Trace::line(dates, sma, Some("50-Day Moving Average")));
        self.finish(fig)
    }

    /// Both series rebased to 1.0 at their first sample.
    pub fn comparison(&self, first: &TimeSeries, second: &TimeSeries) -> Result<ChartDocument, ChartError> {
        let title = format!("Stock Comparison: {} vs {}", first.ticker(), second.ticker());
        let mut fig = Figure::new(title);
        for s in [first, second] {
            let y = normalize(&s.adj_close())?.into_iter().map(Some).collect();
            fig = fig.with_trace(Trace::line(s.dates(), y, Some(s.ticker())));
        }
        self.finish(fig)
    }

    fn finish(&self, figure: Figure) -> Result<ChartDocument, ChartError> {
        ChartDocument::render(figure, &self.script_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::series;

    const CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

    fn builder() -> ChartBuilder {
        ChartBuilder::new(CDN)
    }

    fn scatter_y(doc: &ChartDocument, i: usize) -> &[Option<f64>] {
        match &doc.figure.data[i] {
            Trace::Scatter { y, .. } => y.as_slice(),
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_every_kind_has_its_title() {
        let s = series("AAPL", &[100.0, 101.0, 102.0]);
        let b = builder();
        let cases = [
            (ChartKind::Candlestick, "Candlestick Chart"),
            (ChartKind::HistoricalPrice, "Historical Stock Prices"),
            (ChartKind::DailyReturns, "Daily Returns"),
            (ChartKind::MovingAverage, "Stock Price with Moving Average"),
        ];
        for (kind, title) in cases {
            let doc = b.build(kind, &s).unwrap();
            assert_eq!(doc.title, title);
            assert!(doc.html().contains(&format!("<title>{}</title>", title)));
            assert!(doc.html().contains(CDN));
            assert!(doc.html().contains("Plotly.newPlot"));
        }

        let doc = b.comparison(&s, &series("MSFT", &[10.0, 20.0])).unwrap();
        assert_eq!(doc.title, "Stock Comparison: AAPL vs MSFT");
    }

    #[test]
    fn test_comparison_kind_needs_two_series() {
        let s = series("AAPL", &[1.0]);
        assert!(matches!(
            builder().build(ChartKind::Comparison, &s),
            Err(ChartError::UnsupportedChartKind(_))
        ));
    }

    #[test]
    fn test_daily_returns_trace() {
        let doc = builder().daily_returns(&series("AAPL", &[100.0, 110.0, 99.0])).unwrap();
        let y = scatter_y(&doc, 0);
        assert_eq!(y.len(), 3);
        assert_eq!(y[0], None);
        assert!((y[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((y[2].unwrap() + 0.10).abs() < 1e-12);
        assert!(doc.html().contains("[null,"));
    }

    #[test]
    fn test_moving_average_traces() {
        let doc = builder().moving_average(&series("AAPL", &[20.0; 60])).unwrap();
        assert_eq!(doc.trace_count(), 2);
        assert_eq!(doc.figure.data[0].name(), Some("Stock Price"));
        assert_eq!(doc.figure.data[1].name(), Some("50-Day Moving Average"));

        let sma = scatter_y(&doc, 1);
        assert!(sma[..49].iter().all(Option::is_none));
        assert!(sma[49..].iter().all(|v| (v.unwrap() - 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_moving_average_short_series_still_renders() {
        let doc = builder().moving_average(&series("AAPL", &[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(doc.trace_count(), 2);
        assert!(scatter_y(&doc, 1).iter().all(Option::is_none));
    }

    #[test]
    fn test_comparison_normalizes_each_series() {
        let a = series("AAPL", &[50.0, 75.0, 100.0]);
        let b = series("MSFT", &[200.0, 100.0]);
        let doc = builder().comparison(&a, &b).unwrap();

        assert_eq!(doc.trace_count(), 2);
        assert_eq!(doc.figure.data[0].name(), Some("AAPL"));
        assert_eq!(doc.figure.data[1].name(), Some("MSFT"));
        assert_eq!(scatter_y(&doc, 0), &[Some(1.0), Some(1.5), Some(2.0)]);
        assert_eq!(scatter_y(&doc, 1), &[Some(1.0), Some(0.5)]);
    }

    #[test]
    fn test_title_and_script_are_escaped() {
        let a = series("<A>", &[1.0]);
        let b = series("B", &[1.0]);
        let doc = builder().comparison(&a, &b).unwrap();
        assert!(doc.html().contains("<title>Stock Comparison: &lt;A&gt; vs B</title>"));
        assert!(doc.html().contains("\"\\u003cA>\""));
    }
}
