use leptos::*;
use std::rc::Rc;

use crate::domain::dashboard::{
    ActivityEntry, Alert, DashboardState, MarketData, RiskMetrics, Slice, StrategyPerformance, SystemHealth,
};
use crate::domain::store::{DashboardStore, SliceSelector, SubscriptionHandle};

/// One Leptos signal per store slice, refreshed by a store subscription.
///
/// Components read the signals; writes still go through the store's actions.
#[derive(Clone, Copy)]
pub struct DashboardSignals {
    pub system_health: RwSignal<SystemHealth>,
    pub market_data: RwSignal<MarketData>,
    pub strategy_performance: RwSignal<StrategyPerformance>,
    pub risk_metrics: RwSignal<RiskMetrics>,
    pub alerts: RwSignal<Vec<Alert>>,
    pub activity_log: RwSignal<Vec<ActivityEntry>>,
    pub selected_symbol: RwSignal<String>,
    pub expanded_symbol: RwSignal<Option<String>>,
    pub is_connected: RwSignal<bool>,
    pub last_update: RwSignal<u64>,
    subscription: Option<SubscriptionHandle>,
}

impl DashboardSignals {
    pub fn bind(store: &Rc<DashboardStore>) -> Self {
        let mut signals = store.with_state(Self::from_state);
        let mirror = signals;
        signals.subscription =
            Some(store.subscribe(SliceSelector::All, move |slice, state| mirror.sync(slice, state)));
        signals
    }

    fn from_state(state: &DashboardState) -> Self {
        Self {
            system_health: create_rw_signal(state.system_health.clone()),
            market_data: create_rw_signal(state.market_data.clone()),
            strategy_performance: create_rw_signal(state.strategy_performance.clone()),
            risk_metrics: create_rw_signal(state.risk_metrics.clone()),
            alerts: create_rw_signal(state.alerts.clone()),
            activity_log: create_rw_signal(state.activity_log.clone()),
            selected_symbol: create_rw_signal(state.selected_symbol.clone()),
            expanded_symbol: create_rw_signal(state.expanded_symbol.clone()),
            is_connected: create_rw_signal(state.is_connected),
            last_update: create_rw_signal(state.last_update),
            subscription: None,
        }
    }

    fn sync(&self, slice: Slice, state: &DashboardState) {
        match slice {
            Slice::SystemHealth => self.system_health.set(state.system_health.clone()),
            Slice::MarketData => self.market_data.set(state.market_data.clone()),
            Slice::StrategyPerformance => self.strategy_performance.set(state.strategy_performance.clone()),
            Slice::RiskMetrics => self.risk_metrics.set(state.risk_metrics.clone()),
            Slice::Alerts => self.alerts.set(state.alerts.clone()),
            Slice::ActivityLog => self.activity_log.set(state.activity_log.clone()),
            Slice::SelectedSymbol => self.selected_symbol.set(state.selected_symbol.clone()),
            Slice::ExpandedSymbol => self.expanded_symbol.set(state.expanded_symbol.clone()),
            Slice::IsConnected => self.is_connected.set(state.is_connected),
            Slice::LastUpdate => self.last_update.set(state.last_update),
        }
    }

    /// Stop mirroring. Signals keep their last values.
    pub fn unbind(&self, store: &DashboardStore) -> bool {
        self.subscription.is_some_and(|handle| store.unsubscribe(handle))
    }
}

/// Bind the store and expose the signals to descendant components.
pub fn provide_dashboard(store: &Rc<DashboardStore>) -> DashboardSignals {
    let signals = DashboardSignals::bind(store);
    provide_context(signals);
    signals
}

pub fn use_dashboard() -> Option<DashboardSignals> {
    use_context::<DashboardSignals>()
}
