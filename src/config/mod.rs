use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

/// Market data provider (Yahoo chart API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Chart rendering
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartConfig {
    /// Lookback token, e.g. "1y" or "1 year"
    #[serde(default = "default_period")]
    pub period: String,

    #[serde(default = "default_plotly_js_url")]
    pub plotly_js_url: String,
}

/// Input form window
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_title")]
    pub title: String,

    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://query2.finance.yahoo.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) stock-chart-viewer/0.1"
        .to_string()
}
fn default_period() -> String {
    "1y".to_string()
}
fn default_plotly_js_url() -> String {
    "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string()
}
fn default_window_title() -> String {
    "Stock Analysis Tool".to_string()
}
fn default_width() -> f64 {
    420.0
}
fn default_height() -> f64 {
    300.0
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            plotly_js_url: default_plotly_js_url(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("STOCKCHART").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_sections_fill_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[provider]\ntimeout_secs = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.provider.timeout_secs, 5);
        assert_eq!(cfg.provider.base_url, "https://query2.finance.yahoo.com");
        assert_eq!(cfg.chart.period, "1y");
        assert_eq!(cfg.window.title, "Stock Analysis Tool");
    }
}
