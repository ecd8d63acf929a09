use std::rc::Rc;

use crate::domain::dashboard::{ActivityEntry, Alert, AlertSeverity};
use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::logging::{LogComponent, get_logger, get_time_provider};
use crate::domain::store::DashboardStore;
use crate::infrastructure::dto::AnalysisReceipt;
use crate::infrastructure::{ApiClient, HttpTransport};

/// Fetches from the API and publishes into the store.
///
/// There is no scheduling here; callers decide when to refresh.
pub struct DashboardSync<T: HttpTransport> {
    client: ApiClient<T>,
    store: Rc<DashboardStore>,
}

impl<T: HttpTransport> DashboardSync<T> {
    pub fn new(client: ApiClient<T>, store: Rc<DashboardStore>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn store(&self) -> &Rc<DashboardStore> {
        &self.store
    }

    pub async fn refresh_health(&self) -> ApiResult<()> {
        let report = self.observe(self.client.health_check().await)?;
        let now = get_time_provider().current_timestamp();
        self.store.update_system_health(report.to_system_health(now));
        self.mark_fresh(now);
        Ok(())
    }

    pub async fn refresh_market(&self) -> ApiResult<()> {
        let overview = self.observe(self.client.get_market_overview().await)?;
        self.store.update_market_data(overview.to_market_data());
        self.mark_fresh(get_time_provider().current_timestamp());
        Ok(())
    }

    /// Keeps whatever running flag the store currently holds.
    pub async fn refresh_performance(&self) -> ApiResult<()> {
        let report = self.observe(self.client.get_performance_metrics().await)?;
        let running = self.store.is_running_backtest();
        self.store.update_strategy_performance(report.to_strategy_performance(running));
        self.mark_fresh(get_time_provider().current_timestamp());
        Ok(())
    }

    pub async fn refresh_risk(&self) -> ApiResult<()> {
        let report = self.observe(self.client.get_risk_metrics().await)?;
        self.store.update_risk_metrics(report.to_risk_metrics());
        self.mark_fresh(get_time_provider().current_timestamp());
        Ok(())
    }

    /// Health, market, performance, risk; stops at the first failure.
    pub async fn refresh_all(&self) -> ApiResult<()> {
        self.refresh_health().await?;
        self.refresh_market().await?;
        self.refresh_performance().await?;
        self.refresh_risk().await
    }

    pub async fn run_backtest(
        &self,
        symbols: &[String],
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<AnalysisReceipt> {
        self.store.set_running_backtest(true);
        self.store.add_activity(ActivityEntry::now(format!(
            "Backtest started for {} ({start_date} to {end_date})",
            symbols.join(", ")
        )));

        let result = self.client.run_backtest(symbols, start_date, end_date).await;
        self.store.set_running_backtest(false);

        match &result {
            Ok(receipt) => {
                let status = receipt.status.as_deref().unwrap_or("submitted");
                self.store.add_activity(ActivityEntry::now(format!("Backtest {status}")));
            }
            Err(error) => self.store.add_activity(ActivityEntry::now(format!("Backtest failed: {error}"))),
        }
        self.observe(result)
    }

    fn mark_fresh(&self, now: u64) {
        self.store.set_connected(true);
        self.store.set_last_update(now);
    }

    /// Reflect a failed call in the store, then hand the result back untouched.
    fn observe<R>(&self, result: ApiResult<R>) -> ApiResult<R> {
        if let Err(error) = &result {
            self.record_failure(error);
        }
        result
    }

    fn record_failure(&self, error: &ApiError) {
        let severity = if error.is_transport() {
            self.store.set_connected(false);
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        get_logger().warn(
            LogComponent::Application("DashboardSync"),
            &format!("⚠️ {} failed: {}", error.endpoint(), error.user_message()),
        );
        self.store.add_alert(Alert::now(severity, error.user_message()));
    }
}
