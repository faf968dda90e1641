//! Input controller: form commands → fetch → chart → presenter.
//!
//! ## States
//!
//! `Idle` → `Fetching` on an accepted command, → `Displaying` once the
//! presenter has the document, back to `Idle` when the viewer is dismissed.
//! Any failure returns to `Idle` and becomes one `Alert`. Commands that
//! arrive outside `Idle` are dropped.

use crate::chart::{ChartBuilder, ChartDocument};
use crate::error::{Alert, ChartError};
use crate::models::{ChartKind, ChartRequest, Period, TimeSeries, normalise_symbol};
use crate::source::{self, MarketDataSource};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ── Commands ──────────────────────────────────────────────────────────────────

/// Field values copied out of the form when a button is pressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    pub primary: String,
    pub secondary: String,
    pub chart_kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchSingle(FormSnapshot),
    Compare(FormSnapshot),
}

impl Command {
    /// Presence checks only; the chart kind label is resolved after the fetch.
    pub fn to_request(&self, period: Period) -> Result<ChartRequest, ChartError> {
        match self {
            Command::FetchSingle(form) => {
                let ticker = form.primary.trim();
                if ticker.is_empty() {
                    return Err(ChartError::validation("Please enter a stock ticker."));
                }
                let kind = form.chart_kind.trim();
                if kind.is_empty() {
                    return Err(ChartError::validation("Please select a chart type."));
                }
                Ok(ChartRequest {
                    ticker: ticker.to_string(),
                    period,
                    kind: kind.to_string(),
                    secondary_ticker: None,
                })
            }
            Command::Compare(form) => {
                let (first, second) = (form.primary.trim(), form.secondary.trim());
                if first.is_empty() || second.is_empty() {
                    return Err(ChartError::validation("Please enter two stock tickers."));
                }
                Ok(ChartRequest {
                    ticker: first.to_string(),
                    period,
                    kind: ChartKind::Comparison.label().to_string(),
                    secondary_ticker: Some(second.to_string()),
                })
            }
        }
    }
}

// ── Presenter seam ────────────────────────────────────────────────────────────

/// Shows a finished chart. Only one viewer is open at a time.
pub trait Presenter {
    fn display(&mut self, doc: ChartDocument) -> Result<(), ChartError>;
}

// ── Controller ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Fetching,
    Displaying,
}

pub struct InputController<P: Presenter> {
    source: Arc<dyn MarketDataSource>,
    builder: ChartBuilder,
    presenter: P,
    period: Period,
    // Fetches run to completion on the UI thread
    runtime: tokio::runtime::Runtime,
    state: UiState,
}

impl<P: Presenter> InputController<P> {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        builder: ChartBuilder,
        presenter: P,
        period: Period,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build fetch runtime")?;

        Ok(Self {
            source,
            builder,
            presenter,
            period,
            runtime,
            state: UiState::Idle,
        })
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Run a command and fold any failure into an alert for the form.
    pub fn handle(&mut self, cmd: Command) -> Option<Alert> {
        match self.execute(cmd) {
            Ok(()) => None,
            Err(e) => {
                warn!("{}", e);
                Some(e.alert())
            }
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Result<(), ChartError> {
        if self.state != UiState::Idle {
            debug!("Ignoring {:?} while {:?}", cmd, self.state);
            return Ok(());
        }

        let request = cmd.to_request(self.period)?;
        self.state = UiState::Fetching;

        let outcome = self.render(&request).and_then(|doc| {
            info!("Displaying {:?} ({} traces)", doc.title, doc.trace_count());
            self.presenter.display(doc)
        });

        self.state = match outcome {
            Ok(()) => UiState::Displaying,
            Err(_) => UiState::Idle,
        };
        outcome
    }

    /// The viewer window was closed.
    pub fn viewer_dismissed(&mut self) {
        if self.state == UiState::Displaying {
            debug!("Viewer dismissed");
            self.state = UiState::Idle;
        }
    }

    fn render(&self, request: &ChartRequest) -> Result<ChartDocument, ChartError> {
        match request.secondary_ticker.as_deref() {
            Some(second) => {
                info!(
                    "Comparing {} and {} for the last {}...",
                    normalise_symbol(&request.ticker),
                    normalise_symbol(second),
                    request.period
                );
                let a = self.fetch(&request.ticker, request.period)?;
                let b = self.fetch(second, request.period)?;
                self.builder.comparison(&a, &b)
            }
            None => {
                let series = self.fetch(&request.ticker, request.period)?;
                let kind: ChartKind = request.kind.parse()?;
                self.builder.build(kind, &series)
            }
        }
    }

    fn fetch(&self, ticker: &str, period: Period) -> Result<TimeSeries, ChartError> {
        self.runtime
            .block_on(source::fetch(self.source.as_ref(), ticker, period))
    }
}
