//! Typed shapes of the dashboard API payloads.
//!
//! Every field defaults when missing and unknown fields land in `extra`, so a
//! backend that adds data never breaks decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::dashboard::{
    MarketData, MarketQuote, RiskMetrics, StrategyPerformance, SystemHealth,
};

/// Only analysis type the dashboard triggers.
pub const BACKTESTING_ANALYSIS: &str = "backtesting";

/// `GET /core/health`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: String,
    #[serde(alias = "health_score")]
    pub score: f64,
    pub uptime: String,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthReport {
    pub fn to_system_health(&self, received_at: u64) -> SystemHealth {
        let defaults = SystemHealth::default();
        SystemHealth {
            status: if self.status.is_empty() { defaults.status } else { self.status.clone() },
            score: self.score,
            uptime: if self.uptime.is_empty() { defaults.uptime } else { self.uptime.clone() },
            last_update: Some(received_at),
        }
    }
}

/// Quote row inside a market overview
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteReport {
    pub price: f64,
    pub change: f64,
    #[serde(alias = "changePercent")]
    pub change_percent: f64,
    pub volume: f64,
    pub sparkline: Vec<f64>,
}

impl From<&QuoteReport> for MarketQuote {
    fn from(quote: &QuoteReport) -> Self {
        MarketQuote {
            price: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            volume: quote.volume,
            sparkline: quote.sparkline.clone(),
        }
    }
}

/// `GET /dashboard/market/overview`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketOverview {
    #[serde(alias = "markets", alias = "symbols")]
    pub data: BTreeMap<String, QuoteReport>,
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketOverview {
    /// Full replacement map keyed by the bare contract code (`ES=F` becomes `ES`).
    pub fn to_market_data(&self) -> MarketData {
        self.data
            .iter()
            .map(|(symbol, quote)| (symbol.trim_end_matches("=F").to_string(), MarketQuote::from(quote)))
            .collect()
    }
}

/// `GET /dashboard/performance`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceReport {
    #[serde(alias = "total_pnl")]
    pub pnl: f64,
    #[serde(alias = "sharpe_ratio")]
    pub sharpe: f64,
    #[serde(alias = "max_drawdown")]
    pub drawdown: f64,
    #[serde(alias = "winRate")]
    pub win_rate: f64,
    #[serde(alias = "equityCurve")]
    pub equity_curve: Vec<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PerformanceReport {
    pub fn to_strategy_performance(&self, is_running_backtest: bool) -> StrategyPerformance {
        StrategyPerformance {
            pnl: self.pnl,
            sharpe: self.sharpe,
            drawdown: self.drawdown,
            win_rate: self.win_rate,
            equity_curve: self.equity_curve.clone(),
            is_running_backtest,
        }
    }
}

/// `GET /dashboard/risk`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskReport {
    #[serde(alias = "var95", alias = "var_95_pct")]
    pub var_95: f64,
    pub volatility: f64,
    pub correlation_matrix: BTreeMap<String, f64>,
    pub alerts: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RiskReport {
    pub fn to_risk_metrics(&self) -> RiskMetrics {
        RiskMetrics {
            var95: self.var_95,
            volatility: self.volatility,
            correlation_matrix: self.correlation_matrix.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

/// Parameters of `GET /dashboard/chart`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    pub symbol: String,
    pub timeframe: String,
    pub limit: u32,
}

impl Default for ChartQuery {
    fn default() -> Self {
        Self { symbol: "ES=F".to_string(), timeframe: "1d".to_string(), limit: 100 }
    }
}

impl ChartQuery {
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), ..Self::default() }
    }

    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPoint {
    /// ISO string or epoch number, whichever the backend sends.
    #[serde(alias = "time", alias = "date")]
    pub timestamp: Value,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSeries {
    pub symbol: String,
    pub timeframe: String,
    #[serde(alias = "candles")]
    pub data: Vec<ChartPoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /core/analysis/comprehensive`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub symbols: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub analysis_types: Vec<String>,
}

impl BacktestRequest {
    pub fn new(symbols: &[String], start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            symbols: symbols.to_vec(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            analysis_types: vec![BACKTESTING_ANALYSIS.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReceipt {
    pub analysis_id: Option<String>,
    pub status: Option<String>,
    pub results: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /core/performance/summary`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub total_trades: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error body convention: an optional `detail` string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorDetail {
    pub detail: Option<Value>,
}

impl ErrorDetail {
    pub(crate) fn message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}
