//! Prediction Backend Client
//!
//! HTTP client for the two stateless backend calls the dashboard consumes:
//!
//! - `POST /predict_sales` - predicted sales for a month
//! - `POST /segment_customers` - segment index for a customer feature vector
//!
//! The dashboard only depends on the [`AnalyticsApi`] trait, so tests and
//! alternative transports can stand in for [`ApiClient`].

mod dto;
mod error;
mod http;

pub use dto::{
    CustomerSegment, PredictSalesRequest, PredictedValue, SalesPrediction,
    SegmentCustomersRequest,
};
pub use error::ApiError;
pub use http::ApiClient;

use async_trait::async_trait;

use crate::input::Month;

/// The two backend operations consumed by the dashboard
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Request a sales prediction for `month`
    async fn predict_sales(&self, month: Month) -> Result<SalesPrediction, ApiError>;

    /// Request the segment a customer with `features` belongs to
    async fn segment_customers(&self, features: &[f64]) -> Result<CustomerSegment, ApiError>;
}
