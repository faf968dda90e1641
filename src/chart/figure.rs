//! Minimal plotly.js figure model. Serializes to the `data`/`layout`
//! arguments of `Plotly.newPlot`.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick {
        x: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Scatter {
        x: Vec<NaiveDate>,
        y: Vec<Option<f64>>,
        mode: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl Trace {
    pub fn line(x: Vec<NaiveDate>, y: Vec<Option<f64>>, name: Option<&str>) -> Self {
        Trace::Scatter {
            x,
            y,
            mode: "lines",
            name: name.map(str::to_string),
        }
    }

    #[cfg(test)]
    pub fn name(&self) -> Option<&str> {
        match self {
            Trace::Candlestick { name, .. } | Trace::Scatter { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                title: Title { text: title.into() },
            },
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }
}
