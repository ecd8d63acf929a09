use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value_objects::{AlertSeverity, FuturesSymbol, default_symbols};
use crate::domain::logging::get_time_provider;

/// Maximum number of entries kept in the alert and activity logs.
pub const LOG_CAPACITY: usize = 50;

/// Backend health as shown in the dashboard header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemHealth {
    pub status: String,
    pub score: f64,
    pub uptime: String,
    pub last_update: Option<u64>,
}

impl Default for SystemHealth {
    fn default() -> Self {
        Self { status: "loading".to_string(), score: 0.0, uptime: "0h 0m".to_string(), last_update: None }
    }
}

/// Latest quote for one symbol
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketQuote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub sparkline: Vec<f64>,
}

/// Symbol code to quote. Always replaced as a whole.
pub type MarketData = BTreeMap<String, MarketQuote>;

/// Zeroed quotes for the default futures symbols.
pub fn initial_market_data() -> MarketData {
    default_symbols()
        .into_iter()
        .map(|symbol| (symbol.code().to_string(), MarketQuote::default()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategyPerformance {
    pub pnl: f64,
    pub sharpe: f64,
    pub drawdown: f64,
    pub win_rate: f64,
    pub equity_curve: Vec<f64>,
    pub is_running_backtest: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskMetrics {
    pub var95: f64,
    pub volatility: f64,
    /// Keyed by symbol pair, e.g. `"ES-NQ"`.
    pub correlation_matrix: BTreeMap<String, f64>,
    pub alerts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: u64,
}

impl Alert {
    /// Alert stamped with the current time.
    pub fn now(severity: AlertSeverity, message: impl Into<String>) -> Self {
        Self { severity, message: message.into(), timestamp: get_time_provider().current_timestamp() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub message: String,
    pub timestamp: u64,
}

impl ActivityEntry {
    pub fn now(message: impl Into<String>) -> Self {
        Self { message: message.into(), timestamp: get_time_provider().current_timestamp() }
    }
}

/// Complete dashboard state. Only the store's actions mutate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub system_health: SystemHealth,
    pub market_data: MarketData,
    pub strategy_performance: StrategyPerformance,
    pub risk_metrics: RiskMetrics,
    /// Most recent first.
    pub alerts: Vec<Alert>,
    /// Most recent first.
    pub activity_log: Vec<ActivityEntry>,
    pub selected_symbol: String,
    pub expanded_symbol: Option<String>,
    pub is_connected: bool,
    pub last_update: u64,
}

impl DashboardState {
    pub fn initial(now: u64) -> Self {
        Self {
            system_health: SystemHealth::default(),
            market_data: initial_market_data(),
            strategy_performance: StrategyPerformance::default(),
            risk_metrics: RiskMetrics::default(),
            alerts: Vec::new(),
            activity_log: Vec::new(),
            selected_symbol: FuturesSymbol::Es.code().to_string(),
            expanded_symbol: None,
            is_connected: false,
            last_update: now,
        }
    }
}

/// Insert at the front and drop whatever falls past `LOG_CAPACITY`.
pub(crate) fn push_capped<T>(log: &mut Vec<T>, entry: T) {
    log.insert(0, entry);
    log.truncate(LOG_CAPACITY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_dashboard_defaults() {
        let state = DashboardState::initial(42);
        assert_eq!(state.system_health.status, "loading");
        assert_eq!(state.system_health.uptime, "0h 0m");
        assert_eq!(state.system_health.last_update, None);
        assert_eq!(state.market_data.keys().collect::<Vec<_>>(), vec!["ES", "NQ", "RTY"]);
        assert_eq!(state.selected_symbol, "ES");
        assert!(!state.is_connected);
        assert!(!state.strategy_performance.is_running_backtest);
        assert_eq!(state.last_update, 42);
    }

    #[test]
    fn performance_payload_without_flag_defaults_to_idle() {
        let perf: StrategyPerformance = serde_json::from_str(
            r#"{"pnl": 5, "sharpe": 1, "drawdown": 0, "winRate": 0.5, "equityCurve": []}"#,
        )
        .unwrap();
        assert_eq!(perf.pnl, 5.0);
        assert_eq!(perf.win_rate, 0.5);
        assert!(!perf.is_running_backtest);
    }

    #[test]
    fn push_capped_keeps_newest_first() {
        let mut log = Vec::new();
        for i in 0..(LOG_CAPACITY + 3) {
            push_capped(&mut log, i);
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log[0], LOG_CAPACITY + 2);
        assert_eq!(*log.last().unwrap(), 3);
    }
}
