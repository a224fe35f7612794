//! UI Components
//!
//! Leptos components for the dashboard page.

pub mod chart;
pub mod forms;
pub mod toast;

pub use chart::{SalesChart, SegmentChart};
pub use forms::{PredictionForm, SegmentForm};
pub use toast::Toast;
