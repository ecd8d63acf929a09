//! Reactive dashboard store.
//!
//! One [`DashboardStore`] is created at startup with [`DashboardStore::init`] and shared
//! as an `Rc` handle. State changes only through [`Action`]s; each applied action
//! notifies, in registration order, the subscribers whose selector covers the touched
//! slice. An action dispatched while notifications are running is queued and applied
//! once the current round finishes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::domain::dashboard::{
    ActivityEntry, Alert, DashboardState, MarketData, RiskMetrics, Slice, StrategyPerformance,
    SystemHealth, push_capped,
};
use crate::domain::logging::{LogComponent, get_logger, get_time_provider};
use crate::log_debug;

/// Every mutation the store accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UpdateSystemHealth(SystemHealth),
    UpdateMarketData(MarketData),
    UpdateStrategyPerformance(StrategyPerformance),
    UpdateRiskMetrics(RiskMetrics),
    AddAlert(Alert),
    AddActivity(ActivityEntry),
    SetSelectedSymbol(String),
    SetExpandedSymbol(Option<String>),
    SetConnected(bool),
    SetLastUpdate(u64),
    SetRunningBacktest(bool),
}

impl Action {
    /// Slice this action writes to.
    pub fn slice(&self) -> Slice {
        match self {
            Action::UpdateSystemHealth(_) => Slice::SystemHealth,
            Action::UpdateMarketData(_) => Slice::MarketData,
            Action::UpdateStrategyPerformance(_) | Action::SetRunningBacktest(_) => {
                Slice::StrategyPerformance
            }
            Action::UpdateRiskMetrics(_) => Slice::RiskMetrics,
            Action::AddAlert(_) => Slice::Alerts,
            Action::AddActivity(_) => Slice::ActivityLog,
            Action::SetSelectedSymbol(_) => Slice::SelectedSymbol,
            Action::SetExpandedSymbol(_) => Slice::ExpandedSymbol,
            Action::SetConnected(_) => Slice::IsConnected,
            Action::SetLastUpdate(_) => Slice::LastUpdate,
        }
    }

    fn apply(self, state: &mut DashboardState) {
        match self {
            Action::UpdateSystemHealth(health) => state.system_health = health,
            Action::UpdateMarketData(data) => state.market_data = data,
            Action::UpdateStrategyPerformance(performance) => state.strategy_performance = performance,
            Action::UpdateRiskMetrics(metrics) => state.risk_metrics = metrics,
            Action::AddAlert(alert) => push_capped(&mut state.alerts, alert),
            Action::AddActivity(activity) => push_capped(&mut state.activity_log, activity),
            Action::SetSelectedSymbol(symbol) => state.selected_symbol = symbol,
            Action::SetExpandedSymbol(symbol) => state.expanded_symbol = symbol,
            Action::SetConnected(connected) => state.is_connected = connected,
            Action::SetLastUpdate(timestamp) => state.last_update = timestamp,
            // Only field of a slice updated by merge; siblings stay untouched.
            Action::SetRunningBacktest(running) => {
                state.strategy_performance.is_running_backtest = running
            }
        }
    }
}

/// Which slices a subscriber wants to hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceSelector {
    All,
    Only(Vec<Slice>),
}

impl SliceSelector {
    pub fn matches(&self, slice: Slice) -> bool {
        match self {
            SliceSelector::All => true,
            SliceSelector::Only(slices) => slices.contains(&slice),
        }
    }
}

impl From<Slice> for SliceSelector {
    fn from(slice: Slice) -> Self {
        SliceSelector::Only(vec![slice])
    }
}

impl From<&[Slice]> for SliceSelector {
    fn from(slices: &[Slice]) -> Self {
        SliceSelector::Only(slices.to_vec())
    }
}

impl From<Vec<Slice>> for SliceSelector {
    fn from(slices: Vec<Slice>) -> Self {
        SliceSelector::Only(slices)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }

    /// Rebuild a handle from an id previously handed across the JS boundary.
    pub(crate) fn from_id(id: u64) -> Self {
        Self(id)
    }
}

type Callback = Box<dyn Fn(Slice, &DashboardState)>;

struct Subscriber {
    id: u64,
    selector: SliceSelector,
    active: Cell<bool>,
    callback: Callback,
}

/// Ends a dispatch round. After a subscriber panic, actions queued in that
/// round are dropped instead of leaking into the next dispatch.
struct DispatchGuard<'a> {
    dispatching: &'a Cell<bool>,
    pending: &'a RefCell<VecDeque<Action>>,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.try_borrow_mut() {
            pending.clear();
        }
        self.dispatching.set(false);
    }
}

pub struct DashboardStore {
    state: RefCell<DashboardState>,
    subscribers: RefCell<Vec<Rc<Subscriber>>>,
    pending: RefCell<VecDeque<Action>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::from_state(DashboardState::initial(get_time_provider().current_timestamp()))
    }

    pub fn from_state(state: DashboardState) -> Self {
        Self {
            state: RefCell::new(state),
            subscribers: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            next_id: Cell::new(1),
        }
    }

    /// Create the application's store. Call once at startup and hand the
    /// returned handle to every consumer.
    pub fn init() -> Rc<Self> {
        get_logger().info(LogComponent::Domain("Store"), "🗂️ Dashboard store initialized");
        Rc::new(Self::new())
    }

    pub fn subscribe<F>(&self, selector: impl Into<SliceSelector>, callback: F) -> SubscriptionHandle
    where
        F: Fn(Slice, &DashboardState) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push(Rc::new(Subscriber {
            id,
            selector: selector.into(),
            active: Cell::new(true),
            callback: Box::new(callback),
        }));
        SubscriptionHandle(id)
    }

    /// Returns false if the handle was already removed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        match subscribers.iter().position(|s| s.id == handle.0) {
            Some(index) => {
                // A notification round in progress may still hold this subscriber.
                subscribers.remove(index).active.set(false);
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn dispatch(&self, action: Action) {
        self.pending.borrow_mut().push_back(action);
        if self.dispatching.get() {
            log_debug!(LogComponent::Domain("Store"), "action queued during notification");
            return;
        }

        self.dispatching.set(true);
        let _guard = DispatchGuard { dispatching: &self.dispatching, pending: &self.pending };
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(action) = next else { break };
            let slice = action.slice();
            action.apply(&mut self.state.borrow_mut());
            self.notify(slice);
        }
    }

    fn notify(&self, slice: Slice) {
        let targets: Vec<Rc<Subscriber>> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.selector.matches(slice))
            .cloned()
            .collect();
        let state = self.state.borrow();
        for subscriber in targets {
            if subscriber.active.get() {
                (subscriber.callback)(slice, &state);
            }
        }
    }

    pub fn update_system_health(&self, health: SystemHealth) {
        self.dispatch(Action::UpdateSystemHealth(health));
    }

    pub fn update_market_data(&self, data: MarketData) {
        self.dispatch(Action::UpdateMarketData(data));
    }

    pub fn update_strategy_performance(&self, performance: StrategyPerformance) {
        self.dispatch(Action::UpdateStrategyPerformance(performance));
    }

    pub fn update_risk_metrics(&self, metrics: RiskMetrics) {
        self.dispatch(Action::UpdateRiskMetrics(metrics));
    }

    pub fn add_alert(&self, alert: Alert) {
        self.dispatch(Action::AddAlert(alert));
    }

    pub fn add_activity(&self, activity: ActivityEntry) {
        self.dispatch(Action::AddActivity(activity));
    }

    pub fn set_selected_symbol(&self, symbol: impl Into<String>) {
        self.dispatch(Action::SetSelectedSymbol(symbol.into()));
    }

    pub fn set_expanded_symbol(&self, symbol: Option<String>) {
        self.dispatch(Action::SetExpandedSymbol(symbol));
    }

    pub fn set_connected(&self, connected: bool) {
        self.dispatch(Action::SetConnected(connected));
    }

    pub fn set_last_update(&self, timestamp: u64) {
        self.dispatch(Action::SetLastUpdate(timestamp));
    }

    pub fn set_running_backtest(&self, running: bool) {
        self.dispatch(Action::SetRunningBacktest(running));
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn system_health(&self) -> SystemHealth {
        self.with_state(|s| s.system_health.clone())
    }

    pub fn market_data(&self) -> MarketData {
        self.with_state(|s| s.market_data.clone())
    }

    pub fn strategy_performance(&self) -> StrategyPerformance {
        self.with_state(|s| s.strategy_performance.clone())
    }

    pub fn risk_metrics(&self) -> RiskMetrics {
        self.with_state(|s| s.risk_metrics.clone())
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.with_state(|s| s.alerts.clone())
    }

    pub fn activity_log(&self) -> Vec<ActivityEntry> {
        self.with_state(|s| s.activity_log.clone())
    }

    pub fn selected_symbol(&self) -> String {
        self.with_state(|s| s.selected_symbol.clone())
    }

    pub fn expanded_symbol(&self) -> Option<String> {
        self.with_state(|s| s.expanded_symbol.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.with_state(|s| s.is_connected)
    }

    pub fn last_update(&self) -> u64 {
        self.with_state(|s| s.last_update)
    }

    pub fn is_running_backtest(&self) -> bool {
        self.with_state(|s| s.strategy_performance.is_running_backtest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_reports_its_slice() {
        assert_eq!(Action::SetRunningBacktest(true).slice(), Slice::StrategyPerformance);
        assert_eq!(Action::AddActivity(ActivityEntry::now("x")).slice(), Slice::ActivityLog);
        assert_eq!(Action::SetExpandedSymbol(None).slice(), Slice::ExpandedSymbol);
    }

    #[test]
    fn dispatch_flag_resets_after_round() {
        let store = DashboardStore::new();
        store.set_connected(true);
        assert!(!store.dispatching.get());
        assert!(store.pending.borrow().is_empty());
    }

    #[test]
    fn from_state_starts_from_the_given_state() {
        let mut state = DashboardState::initial(3);
        state.selected_symbol = "RTY".to_string();
        let store = DashboardStore::from_state(state.clone());
        assert_eq!(store.snapshot(), state);
        assert_eq!(store.with_state(|s| s.last_update), 3);
    }

    #[test]
    fn unsubscribe_twice_reports_missing_handle() {
        let store = DashboardStore::new();
        let handle = store.subscribe(SliceSelector::All, |_, _| {});
        assert!(store.unsubscribe(handle));
        assert!(!store.unsubscribe(handle));
        assert_eq!(store.subscriber_count(), 0);
    }
}
