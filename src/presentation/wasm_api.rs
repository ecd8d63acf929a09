use gloo::utils::format::JsValueSerdeExt;
use js_sys::{Function, Promise};
use serde::Serialize;
use std::rc::Rc;
use std::str::FromStr;
use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::DashboardSync;
use crate::domain::dashboard::{Alert, AlertSeverity, Slice};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::store::{DashboardStore, SliceSelector, SubscriptionHandle};
use crate::infrastructure::{ApiClient, ApiConfig, ChartQuery, GlooTransport};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {e}")))
}

fn parse_slices(names: Vec<String>) -> SliceSelector {
    if names.is_empty() {
        return SliceSelector::All;
    }
    let slices: Vec<Slice> =
        names.iter().filter_map(|name| Slice::iter().find(|slice| slice.as_ref() == name)).collect();
    SliceSelector::Only(slices)
}

/// JavaScript entry point: one store plus the sync use cases around it
#[wasm_bindgen]
pub struct DashboardApi {
    store: Rc<DashboardStore>,
    sync: Rc<DashboardSync<GlooTransport>>,
}

#[wasm_bindgen]
impl DashboardApi {
    /// `baseUrl` overrides the configured API location.
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> DashboardApi {
        let config = match base_url {
            Some(url) => ApiConfig::from_env().with_base_url(url),
            None => ApiConfig::from_env(),
        };
        let store = DashboardStore::init();
        let sync = DashboardSync::new(ApiClient::from_config(config), store.clone());
        Self { store, sync: Rc::new(sync) }
    }

    /// Whole state as a plain JS object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.store.snapshot())
    }

    /// Calls `callback(sliceName, state)` on every change to the named slices
    /// (all slices when the list is empty). Returns an id for `unsubscribe`.
    pub fn subscribe(&self, callback: Function, slices: Vec<String>) -> u64 {
        let handle = self.store.subscribe(parse_slices(slices), move |slice, state| {
            let payload = match to_js(state) {
                Ok(payload) => payload,
                Err(_) => return,
            };
            if let Err(e) = callback.call2(&JsValue::NULL, &JsValue::from_str(slice.as_ref()), &payload) {
                get_logger().warn(
                    LogComponent::Presentation("DashboardApi"),
                    &format!("Subscriber threw on {slice}: {e:?}"),
                );
            }
        });
        handle.id()
    }

    pub fn unsubscribe(&self, id: u64) -> bool {
        self.store.unsubscribe(SubscriptionHandle::from_id(id))
    }

    #[wasm_bindgen(js_name = selectSymbol)]
    pub fn select_symbol(&self, symbol: String) {
        self.store.set_selected_symbol(symbol);
    }

    #[wasm_bindgen(js_name = expandSymbol)]
    pub fn expand_symbol(&self, symbol: Option<String>) {
        self.store.set_expanded_symbol(symbol);
    }

    #[wasm_bindgen(js_name = setConnected)]
    pub fn set_connected(&self, connected: bool) {
        self.store.set_connected(connected);
    }

    /// Unknown severities fall back to `info`.
    #[wasm_bindgen(js_name = addAlert)]
    pub fn add_alert(&self, severity: String, message: String) {
        let severity = AlertSeverity::from_str(&severity).unwrap_or_default();
        self.store.add_alert(Alert::now(severity, message));
    }

    #[wasm_bindgen(js_name = refreshAll)]
    pub fn refresh_all(&self) -> Promise {
        let sync = self.sync.clone();
        future_to_promise(async move {
            sync.refresh_all().await.map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(JsValue::TRUE)
        })
    }

    #[wasm_bindgen(js_name = runBacktest)]
    pub fn run_backtest(&self, symbols: Vec<String>, start_date: String, end_date: String) -> Promise {
        let sync = self.sync.clone();
        future_to_promise(async move {
            let receipt = sync
                .run_backtest(&symbols, &start_date, &end_date)
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            to_js(&receipt)
        })
    }

    /// Missing arguments use `ES=F`, `1d` and 100.
    #[wasm_bindgen(js_name = chartData)]
    pub fn chart_data(&self, symbol: Option<String>, timeframe: Option<String>, limit: Option<u32>) -> Promise {
        let sync = self.sync.clone();
        let defaults = ChartQuery::default();
        let query = ChartQuery {
            symbol: symbol.unwrap_or(defaults.symbol),
            timeframe: timeframe.unwrap_or(defaults.timeframe),
            limit: limit.unwrap_or(defaults.limit),
        };
        future_to_promise(async move {
            let series = sync
                .client()
                .get_chart_data(&query)
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            to_js(&series)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slice_list_selects_everything() {
        assert_eq!(parse_slices(Vec::new()), SliceSelector::All);
    }

    #[test]
    fn unknown_slice_names_are_dropped() {
        let selector = parse_slices(vec!["alerts".to_string(), "bogus".to_string(), "isConnected".to_string()]);
        assert_eq!(selector, SliceSelector::Only(vec![Slice::Alerts, Slice::IsConnected]));
    }
}
