//! HTTP API Client
//!
//! Functions for calling the prediction backend.

use gloo_net::http::Request;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Local storage key overriding [`DEFAULT_API_BASE`]
const API_URL_KEY: &str = "salesdash_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Read a boolean flag from local storage ("1" or "true")
pub fn local_flag(key: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(key).ok().flatten())
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

// ============ Request / Response Types ============

#[derive(Debug, serde::Serialize)]
struct PredictSalesRequest {
    month: u8,
}

#[derive(Debug, serde::Serialize)]
struct SegmentCustomersRequest<'a> {
    features: &'a [f64],
}

#[derive(Debug, serde::Deserialize)]
struct PredictSalesResponse {
    #[serde(default)]
    predicted_sales: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct SegmentCustomersResponse {
    customer_segment: u32,
}

/// First number in a possibly nested list such as `[[171.3]]`
pub fn first_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::Array(items) => items.first().and_then(first_number),
        _ => None,
    }
}

// ============ API Functions ============

async fn post_json<B: serde::Serialize, R: serde::de::DeserializeOwned>(
    path: &str,
    body: &B,
) -> Result<R, String> {
    let url = format!("{}/{}", get_api_base(), path);

    let response = Request::post(&url)
        .json(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        let text = response.text().await.unwrap_or_default();
        return Err(format!("API error {}: {}", response.status(), text));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Predict sales for a month (1-12)
pub async fn predict_sales(month: u8) -> Result<f64, String> {
    let response: PredictSalesResponse =
        post_json("predict_sales", &PredictSalesRequest { month }).await?;

    response
        .predicted_sales
        .as_ref()
        .and_then(first_number)
        .ok_or_else(|| "Backend response carried no predicted value".to_string())
}

/// Classify a customer by features
pub async fn segment_customers(features: &[f64]) -> Result<u32, String> {
    let response: SegmentCustomersResponse =
        post_json("segment_customers", &SegmentCustomersRequest { features }).await?;
    Ok(response.customer_segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number(&json!(4200)), Some(4200.0));
        assert_eq!(first_number(&json!([[171.5]])), Some(171.5));
        assert_eq!(first_number(&json!([])), None);
        assert_eq!(first_number(&json!("x")), None);
    }
}
