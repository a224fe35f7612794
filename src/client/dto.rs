//! Request/Response DTOs
//!
//! Wire types for the prediction backend.

use serde::{Deserialize, Serialize};

use crate::input::Month;

#[derive(Debug, Clone, Serialize)]
pub struct PredictSalesRequest {
    pub month: Month,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentCustomersRequest {
    pub features: Vec<f64>,
}

/// Predicted sales as sent by the backend
///
/// The reference backend serializes the raw model output, so the number
/// usually arrives wrapped in one or more single-element lists
/// (`[[171.3]]`). A bare number is accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictedValue {
    Scalar(f64),
    Nested(Vec<PredictedValue>),
}

impl PredictedValue {
    /// First scalar in depth-first order
    pub fn first_scalar(&self) -> Option<f64> {
        match self {
            PredictedValue::Scalar(value) => Some(*value),
            PredictedValue::Nested(values) => values.first().and_then(PredictedValue::first_scalar),
        }
    }
}

/// `POST /predict_sales` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPrediction {
    #[serde(default)]
    pub predicted_sales: Option<PredictedValue>,
}

impl SalesPrediction {
    pub fn new(value: f64) -> Self {
        Self {
            predicted_sales: Some(PredictedValue::Scalar(value)),
        }
    }

    /// The predicted value, if the backend sent one
    pub fn value(&self) -> Option<f64> {
        self.predicted_sales
            .as_ref()
            .and_then(PredictedValue::first_scalar)
    }
}

/// `POST /segment_customers` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSegment {
    pub customer_segment: u32,
}
