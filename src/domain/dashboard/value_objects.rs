use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Futures contracts tracked by the dashboard out of the box
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum FuturesSymbol {
    #[strum(serialize = "ES")]
    #[serde(rename = "ES")]
    Es,
    #[strum(serialize = "NQ")]
    #[serde(rename = "NQ")]
    Nq,
    #[strum(serialize = "RTY")]
    #[serde(rename = "RTY")]
    Rty,
}

impl FuturesSymbol {
    pub fn code(&self) -> &'static str {
        (*self).into()
    }

    /// Continuous-contract ticker the backend's market data source expects.
    pub fn yahoo_ticker(&self) -> String {
        format!("{}=F", self.code())
    }
}

pub fn default_symbols() -> Vec<FuturesSymbol> {
    FuturesSymbol::iter().collect()
}

/// Severity attached to alert log entries
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

/// Named sub-object of the dashboard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Slice {
    SystemHealth,
    MarketData,
    StrategyPerformance,
    RiskMetrics,
    Alerts,
    ActivityLog,
    SelectedSymbol,
    ExpandedSymbol,
    IsConnected,
    LastUpdate,
}
