//! Prediction Backend REST Client

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use super::dto::{CustomerSegment, PredictSalesRequest, SalesPrediction, SegmentCustomersRequest};
use super::{AnalyticsApi, ApiError};
use crate::config::ApiConfig;
use crate::input::Month;

/// REST client for the prediction backend
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a JSON POST and decode the JSON response
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, &url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, &url))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        tracing::debug!(url = %url, body = %text, "Prediction backend response");

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    async fn predict_sales(&self, month: Month) -> Result<SalesPrediction, ApiError> {
        self.post_json("predict_sales", &PredictSalesRequest { month })
            .await
    }

    async fn segment_customers(&self, features: &[f64]) -> Result<CustomerSegment, ApiError> {
        let body = SegmentCustomersRequest {
            features: features.to_vec(),
        };
        self.post_json("segment_customers", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn recording_backend(reply: Value, seen: Arc<Mutex<Vec<Value>>>) -> Router {
        let handler = move |Json(body): Json<Value>| {
            let seen = Arc::clone(&seen);
            let reply = reply.clone();
            async move {
                seen.lock().unwrap().push(body);
                Json(reply)
            }
        };
        Router::new()
            .route("/predict_sales", post(handler.clone()))
            .route("/segment_customers", post(handler))
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:5000/")).unwrap();
        assert_eq!(
            client.endpoint("predict_sales"),
            "http://127.0.0.1:5000/predict_sales"
        );
    }

    #[tokio::test]
    async fn test_predict_sales() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(recording_backend(
            json!({"predicted_sales": [[171.5]]}),
            Arc::clone(&seen),
        ))
        .await;

        let client = ApiClient::new(ApiConfig::new(base)).unwrap();
        let prediction = client.predict_sales(Month::new(6).unwrap()).await.unwrap();

        assert_eq!(prediction.value(), Some(171.5));
        assert_eq!(*seen.lock().unwrap(), vec![json!({"month": 6})]);
    }

    #[tokio::test]
    async fn test_segment_customers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_backend(recording_backend(
            json!({"customer_segment": 2}),
            Arc::clone(&seen),
        ))
        .await;

        let client = ApiClient::new(ApiConfig::new(base)).unwrap();
        let segment = client
            .segment_customers(&[25.0, 40000.0, 30.0])
            .await
            .unwrap();

        assert_eq!(segment.customer_segment, 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![json!({"features": [25.0, 40000.0, 30.0]})]
        );
    }

    #[tokio::test]
    async fn test_error_status() {
        let router = Router::new().route(
            "/predict_sales",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let base = spawn_backend(router).await;

        let client = ApiClient::new(ApiConfig::new(base)).unwrap();
        let err = client
            .predict_sales(Month::new(1).unwrap())
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model not loaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let router = Router::new().route(
            "/segment_customers",
            post(|| async { Json(json!({"segment": "gold"})) }),
        );
        let base = spawn_backend(router).await;

        let client = ApiClient::new(ApiConfig::new(base)).unwrap();
        let err = client.segment_customers(&[1.0]).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_backend_down() {
        // Grab a free port, then close it again
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(ApiConfig::new(format!("http://{}", addr))).unwrap();
        let err = client
            .predict_sales(Month::new(3).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unavailable(_)));
    }
}
