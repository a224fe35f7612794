//! Dashboard View
//!
//! Owns the sales line chart and the customer segment pie chart, reads raw
//! form input, calls the prediction backend and folds responses into the
//! charts.
//!
//! ## Request flow
//!
//! 1. Raw text is parsed; invalid input is logged and nothing is sent
//! 2. A ticket is issued under the state lock
//! 3. The backend call runs with the lock released
//! 4. The response is applied under the lock and the chart is redrawn once
//!
//! Earlier requests are never cancelled; see [`DashboardState::apply_sales_prediction`]
//! for how late responses are treated.

mod chart;
mod state;
mod surface;

pub use chart::{
    AxisOptions, ChartConfig, ChartData, ChartKind, ChartOptions, Dataset, EXTRA_SEGMENT_LIMIT,
    MIN_SEGMENTS, SEGMENT_COLORS,
};
pub use state::{
    ChartInstance, DashboardSnapshot, DashboardState, RequestKind, StatusMessage, Ticket,
    SALES_CANVAS, SEGMENT_CANVAS,
};
pub use surface::{render_text, ChartHandle, ChartSurface, TerminalSurface};

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::client::{AnalyticsApi, ApiError};
use crate::config::DashboardConfig;
use crate::input::{self, InputError};

/// Errors surfaced by dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Charts have not been initialized")]
    NotInitialized,

    #[error("Backend response carried no predicted value")]
    MissingValue,

    #[error("Backend returned segment {segment}, the chart holds at most {max} buckets")]
    SegmentOutOfRange { segment: usize, max: usize },
}

/// Dashboard controller
///
/// Cheap to clone; clones share the same charts and backend client.
pub struct Dashboard<A> {
    api: Arc<A>,
    state: Arc<Mutex<DashboardState>>,
    config: Arc<DashboardConfig>,
}

impl<A> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A: AnalyticsApi + 'static> Dashboard<A> {
    pub fn new(api: Arc<A>, surface: Box<dyn ChartSurface>, config: DashboardConfig) -> Self {
        let state = DashboardState::new(surface, config.segment_labels.clone());
        Self {
            api,
            state: Arc::new(Mutex::new(state)),
            config: Arc::new(config),
        }
    }

    /// Create both charts, and schedule the sample sequence if configured
    pub async fn initialize(&self) -> Option<JoinHandle<()>> {
        self.state.lock().await.initialize();
        tracing::info!("Dashboard charts initialized");

        if self.config.demo_on_start {
            Some(self.spawn_demo(Duration::from_millis(self.config.demo_delay_ms)))
        } else {
            None
        }
    }

    /// Run [`Dashboard::run_demo`] after `delay` on a background task
    pub fn spawn_demo(&self, delay: Duration) -> JoinHandle<()> {
        let dashboard = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = dashboard.run_demo().await {
                tracing::warn!("Sample update sequence skipped: {}", e);
            }
        })
    }

    /// Sample sequence: one sales point at `(0, 0)` and one count per segment
    pub async fn run_demo(&self) -> Result<(), DashboardError> {
        let mut state = self.state.lock().await;
        state.update_sales_chart("0", 0.0)?;
        for segment in 0..3 {
            state.update_segment_chart(segment)?;
        }
        Ok(())
    }

    /// Handle the month form: validate, call the backend, plot the result
    pub async fn request_sales_prediction(&self, raw_month: &str) -> Result<f64, DashboardError> {
        let month = input::parse_month(raw_month).map_err(|e| {
            tracing::error!(input = %raw_month, "{}", e);
            e
        })?;

        let ticket = self
            .state
            .lock()
            .await
            .issue_ticket(RequestKind::SalesPrediction);
        tracing::info!(request_id = %ticket.request_id, month = month.get(), "Requesting sales prediction");

        let result = self
            .api
            .predict_sales(month)
            .await
            .map_err(DashboardError::from)
            .and_then(|prediction| prediction.value().ok_or(DashboardError::MissingValue));

        let mut state = self.state.lock().await;
        let applied = result.and_then(|value| {
            tracing::debug!(request_id = %ticket.request_id, value, "Sales prediction received");
            state
                .apply_sales_prediction(&ticket, &month.to_string(), value)
                .map(|()| value)
        });
        if let Err(e) = &applied {
            state.record_failure(&ticket, e);
        }
        applied
    }

    /// Handle the feature form: validate, call the backend, count the segment
    pub async fn request_customer_segment(&self, raw_features: &str) -> Result<u32, DashboardError> {
        let features = input::parse_features(raw_features).map_err(|e| {
            tracing::error!(input = %raw_features, "{}", e);
            e
        })?;

        let ticket = self
            .state
            .lock()
            .await
            .issue_ticket(RequestKind::CustomerSegment);
        tracing::info!(
            request_id = %ticket.request_id,
            features = features.len(),
            "Requesting customer segment"
        );

        let result = self
            .api
            .segment_customers(&features)
            .await
            .map_err(DashboardError::from);

        let mut state = self.state.lock().await;
        let applied = result.and_then(|response| {
            let segment = response.customer_segment;
            tracing::debug!(request_id = %ticket.request_id, segment, "Customer segment received");
            state
                .apply_customer_segment(&ticket, segment)
                .map(|()| segment)
        });
        if let Err(e) = &applied {
            state.record_failure(&ticket, e);
        }
        applied
    }

    /// Shared view state
    pub fn state(&self) -> Arc<Mutex<DashboardState>> {
        Arc::clone(&self.state)
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::state::testing::RecordingSurface;
    use super::*;
    use crate::client::{CustomerSegment, SalesPrediction};
    use crate::input::Month;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Backend stub with canned answers and a call counter
    #[derive(Default)]
    struct FakeApi {
        predicted_sales: Option<f64>,
        segment: u32,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalyticsApi for FakeApi {
        async fn predict_sales(&self, _month: Month) -> Result<SalesPrediction, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Unavailable("http://127.0.0.1:5000".into()));
            }
            Ok(SalesPrediction {
                predicted_sales: self.predicted_sales.map(crate::client::PredictedValue::Scalar),
            })
        }

        async fn segment_customers(&self, _features: &[f64]) -> Result<CustomerSegment, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Timeout);
            }
            Ok(CustomerSegment {
                customer_segment: self.segment,
            })
        }
    }

    async fn dashboard(api: FakeApi) -> (Dashboard<FakeApi>, Arc<FakeApi>, RecordingSurface) {
        let api = Arc::new(api);
        let surface = RecordingSurface::default();
        let dashboard = Dashboard::new(
            Arc::clone(&api),
            Box::new(surface.clone()),
            DashboardConfig::default(),
        );
        assert!(dashboard.initialize().await.is_none());
        surface.clear();
        (dashboard, api, surface)
    }

    #[tokio::test]
    async fn test_invalid_month_never_calls_backend() {
        let (dashboard, api, surface) = dashboard(FakeApi {
            predicted_sales: Some(1.0),
            ..Default::default()
        })
        .await;

        for raw in ["13", "0", "abc", ""] {
            let err = dashboard.request_sales_prediction(raw).await.unwrap_err();
            assert!(matches!(err, DashboardError::Input(_)));
        }

        assert_eq!(api.calls(), 0);
        assert!(surface.events().is_empty());
        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.predicted_sales, None);
        assert!(snapshot.sales_chart.unwrap().labels.is_empty());
    }

    #[tokio::test]
    async fn test_valid_month_plots_prediction() {
        let (dashboard, api, surface) = dashboard(FakeApi {
            predicted_sales: Some(4200.0),
            ..Default::default()
        })
        .await;

        let value = dashboard.request_sales_prediction("6").await.unwrap();
        assert_eq!(value, 4200.0);
        assert_eq!(api.calls(), 1);
        assert_eq!(surface.redraws(), 1);

        let snapshot = dashboard.snapshot().await;
        let chart = snapshot.sales_chart.unwrap();
        assert_eq!(chart.labels, vec!["6"]);
        assert_eq!(chart.values(), &[4200.0]);
        assert_eq!(snapshot.predicted_sales, Some(4200.0));
    }

    #[tokio::test]
    async fn test_invalid_features_never_call_backend() {
        let (dashboard, api, _surface) = dashboard(FakeApi::default()).await;

        let err = dashboard
            .request_customer_segment("25, forty, 30")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Input(InputError::InvalidFeature { position: 1, .. })
        ));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_segment_increments_one_bucket() {
        let (dashboard, _api, surface) = dashboard(FakeApi {
            segment: 2,
            ..Default::default()
        })
        .await;

        let segment = dashboard
            .request_customer_segment("45, 60000, 70")
            .await
            .unwrap();
        assert_eq!(segment, 2);
        assert_eq!(surface.redraws(), 1);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.segment_chart.unwrap().values(), &[0.0, 0.0, 1.0]);
        assert_eq!(snapshot.customer_segment, Some(2));
    }

    #[tokio::test]
    async fn test_backend_failure_is_surfaced() {
        let (dashboard, api, surface) = dashboard(FakeApi {
            fail: true,
            ..Default::default()
        })
        .await;

        let err = dashboard.request_sales_prediction("6").await.unwrap_err();
        assert!(matches!(err, DashboardError::Api(ApiError::Unavailable(_))));
        assert_eq!(api.calls(), 1);
        assert_eq!(surface.redraws(), 0);

        let snapshot = dashboard.snapshot().await;
        assert!(snapshot.last_error.is_some());
        assert_eq!(snapshot.predicted_sales, None);
    }

    #[tokio::test]
    async fn test_segment_failure_is_surfaced() {
        let (dashboard, api, surface) = dashboard(FakeApi {
            fail: true,
            ..Default::default()
        })
        .await;

        let err = dashboard
            .request_customer_segment("25, 40000, 30")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Api(ApiError::Timeout)));
        assert_eq!(api.calls(), 1);
        assert_eq!(surface.redraws(), 0);

        let snapshot = dashboard.snapshot().await;
        assert!(snapshot.last_error.is_some());
        assert_eq!(snapshot.customer_segment, None);
        assert_eq!(snapshot.segment_chart.unwrap().values(), &[0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_oversized_segment_is_rejected() {
        let (dashboard, _api, surface) = dashboard(FakeApi {
            segment: u32::MAX,
            ..Default::default()
        })
        .await;

        let err = dashboard
            .request_customer_segment("25, 40000, 30")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::SegmentOutOfRange { .. }));
        assert_eq!(surface.redraws(), 0);

        let snapshot = dashboard.snapshot().await;
        assert!(snapshot.last_error.is_some());
        assert_eq!(snapshot.customer_segment, None);
        assert_eq!(snapshot.segment_chart.unwrap().values(), &[0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_missing_prediction_is_not_plotted() {
        let (dashboard, _api, surface) = dashboard(FakeApi::default()).await;

        let err = dashboard.request_sales_prediction("2").await.unwrap_err();
        assert!(matches!(err, DashboardError::MissingValue));
        assert_eq!(surface.redraws(), 0);
    }

    #[tokio::test]
    async fn test_demo_sequence() {
        let (dashboard, _api, surface) = dashboard(FakeApi::default()).await;

        dashboard
            .spawn_demo(Duration::from_millis(1))
            .await
            .unwrap();

        let snapshot = dashboard.snapshot().await;
        let sales = snapshot.sales_chart.unwrap();
        assert_eq!(sales.labels, vec!["0"]);
        assert_eq!(sales.values(), &[0.0]);
        assert_eq!(snapshot.segment_chart.unwrap().values(), &[1.0, 1.0, 1.0]);
        assert_eq!(surface.redraws(), 4);
    }

    #[tokio::test]
    async fn test_initialize_schedules_demo_when_enabled() {
        let api = Arc::new(FakeApi::default());
        let surface = RecordingSurface::default();
        let config = DashboardConfig {
            demo_on_start: true,
            demo_delay_ms: 1,
            ..Default::default()
        };
        let dashboard = Dashboard::new(api, Box::new(surface.clone()), config);

        let handle = dashboard.initialize().await.expect("demo scheduled");
        handle.await.unwrap();

        assert_eq!(surface.redraws(), 4);
    }

    /// Backend whose responses are released one request at a time. Sales
    /// requests are keyed by month, segment requests by their first feature,
    /// which is also the segment returned.
    struct GatedApi {
        gates: HashMap<u32, Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl GatedApi {
        fn new(keys: &[u32]) -> Arc<Self> {
            Arc::new(Self {
                gates: keys.iter().map(|k| (*k, Arc::new(Notify::new()))).collect(),
                calls: AtomicUsize::new(0),
            })
        }

        fn release(&self, key: u32) {
            self.gates[&key].notify_one();
        }
    }

    #[async_trait]
    impl AnalyticsApi for GatedApi {
        async fn predict_sales(&self, month: Month) -> Result<SalesPrediction, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gates[&(month.get() as u32)].notified().await;
            Ok(SalesPrediction::new(month.get() as f64 * 100.0))
        }

        async fn segment_customers(&self, features: &[f64]) -> Result<CustomerSegment, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let segment = features[0] as u32;
            self.gates[&segment].notified().await;
            Ok(CustomerSegment {
                customer_segment: segment,
            })
        }
    }

    async fn wait_for_calls(api: &GatedApi, n: usize) {
        while api.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_late_response_does_not_replace_newer_value() {
        let api = GatedApi::new(&[3, 4]);
        let dashboard = Dashboard::new(
            Arc::clone(&api),
            Box::new(RecordingSurface::default()),
            DashboardConfig::default(),
        );
        dashboard.initialize().await;

        let older = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.request_sales_prediction("3").await })
        };
        wait_for_calls(&api, 1).await;
        let newer = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.request_sales_prediction("4").await })
        };
        wait_for_calls(&api, 2).await;

        // Newer submission answers first
        api.release(4);
        assert_eq!(newer.await.unwrap().unwrap(), 400.0);
        api.release(3);
        assert_eq!(older.await.unwrap().unwrap(), 300.0);

        let snapshot = dashboard.snapshot().await;
        let chart = snapshot.sales_chart.unwrap();
        assert_eq!(chart.labels, vec!["4", "3"]);
        assert_eq!(chart.values(), &[400.0, 300.0]);
        assert_eq!(snapshot.predicted_sales, Some(400.0));
    }

    #[tokio::test]
    async fn test_late_segment_does_not_replace_newer_value() {
        let api = GatedApi::new(&[1, 2]);
        let dashboard = Dashboard::new(
            Arc::clone(&api),
            Box::new(RecordingSurface::default()),
            DashboardConfig::default(),
        );
        dashboard.initialize().await;

        let older = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.request_customer_segment("1, 40000, 30").await })
        };
        wait_for_calls(&api, 1).await;
        let newer = {
            let dashboard = dashboard.clone();
            tokio::spawn(async move { dashboard.request_customer_segment("2, 60000, 70").await })
        };
        wait_for_calls(&api, 2).await;

        api.release(2);
        assert_eq!(newer.await.unwrap().unwrap(), 2);
        api.release(1);
        assert_eq!(older.await.unwrap().unwrap(), 1);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.segment_chart.unwrap().values(), &[0.0, 1.0, 1.0]);
        assert_eq!(snapshot.customer_segment, Some(2));
    }
}
