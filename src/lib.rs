//! # Salesdash
//!
//! Sales Insight Dashboard - a sales prediction line chart and a customer
//! segment pie chart driven by two calls to a prediction backend.
//!
//! ## Modules
//!
//! - [`client`]: HTTP client for `/predict_sales` and `/segment_customers`
//! - [`dashboard`]: Chart state, input handling and response application
//! - [`input`]: Form input validation
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salesdash::{ApiClient, Config, Dashboard, TerminalSurface};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let client = Arc::new(ApiClient::new(config.api.clone())?);
//!
//!     let surface = Box::new(TerminalSurface::new(std::io::stdout()));
//!     let dashboard = Dashboard::new(client, surface, config.dashboard.clone());
//!     dashboard.initialize().await;
//!
//!     let predicted = dashboard.request_sales_prediction("6").await?;
//!     println!("Predicted sales for June: {:.1}", predicted);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod input;
pub mod logging;

pub use client::{AnalyticsApi, ApiClient, ApiError, CustomerSegment, SalesPrediction};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig};

pub use dashboard::{
    ChartConfig, ChartData, ChartKind, ChartSurface, Dashboard, DashboardError,
    DashboardSnapshot, TerminalSurface,
};

pub use input::{parse_features, parse_month, InputError, Month};
