use thiserror::Error;

/// Everything that can stop a chart request before a chart is shown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch data for {ticker}: {cause}")]
    DataUnavailable { ticker: String, cause: String },

    #[error("Unsupported chart type: {0:?}")]
    UnsupportedChartKind(String),

    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    #[error("Render failure: {0}")]
    RenderFailure(String),
}

impl ChartError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ChartError::Validation(msg.into())
    }

    pub fn unavailable(ticker: &str, cause: impl std::fmt::Display) -> Self {
        ChartError::DataUnavailable {
            ticker: ticker.to_string(),
            cause: cause.to_string(),
        }
    }

    /// The one place a failure is turned into what the user sees.
    pub fn alert(&self) -> Alert {
        let message = match self {
            ChartError::Validation(msg) => msg.clone(),
            ChartError::UnsupportedChartKind(_) => "Please select a chart type.".to_string(),
            other => other.to_string(),
        };
        Alert {
            title: "Error".to_string(),
            message,
        }
    }
}

/// A modal message for the form window.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}
