//! Dashboard State
//!
//! Everything the view owns: the two charts, the last predicted value and
//! segment, and the status of the last request. All mutation goes through
//! `&mut self`, so a caller holding the lock applies a response atomically.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::chart::{self, ChartConfig, ChartData, EXTRA_SEGMENT_LIMIT};
use super::surface::{self, ChartHandle, ChartSurface};
use super::DashboardError;

/// Canvas id of the sales line chart
pub const SALES_CANVAS: &str = "salesChart";
/// Canvas id of the segment pie chart
pub const SEGMENT_CANVAS: &str = "customerSegmentChart";

/// A chart attached to a surface
#[derive(Debug, Clone)]
pub struct ChartInstance {
    pub handle: ChartHandle,
    pub config: ChartConfig,
}

/// Which call a ticket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    SalesPrediction,
    CustomerSegment,
}

/// Issued when a request is submitted; used to order responses
#[derive(Debug, Clone)]
pub struct Ticket {
    pub kind: RequestKind,
    pub seq: u64,
    pub request_id: Uuid,
}

/// User-visible status of a failed request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Point-in-time copy of the view for display or serialization
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub predicted_sales: Option<f64>,
    pub customer_segment: Option<u32>,
    pub sales_chart: Option<ChartData>,
    pub segment_chart: Option<ChartData>,
    pub last_error: Option<StatusMessage>,
}

pub struct DashboardState {
    surface: Box<dyn ChartSurface>,
    segment_labels: Vec<String>,
    max_segments: usize,
    sales_chart: Option<ChartInstance>,
    segment_chart: Option<ChartInstance>,
    predicted_sales: Option<f64>,
    customer_segment: Option<u32>,
    next_seq: u64,
    latest_sales_seq: u64,
    latest_segment_seq: u64,
    last_error: Option<StatusMessage>,
}

impl DashboardState {
    pub fn new(surface: Box<dyn ChartSurface>, segment_labels: Vec<String>) -> Self {
        let segment_labels = chart::segment_labels(&segment_labels);
        Self {
            surface,
            max_segments: segment_labels.len() + EXTRA_SEGMENT_LIMIT,
            segment_labels,
            sales_chart: None,
            segment_chart: None,
            predicted_sales: None,
            customer_segment: None,
            next_seq: 1,
            latest_sales_seq: 0,
            latest_segment_seq: 0,
            last_error: None,
        }
    }

    /// (Re)create both charts with empty datasets
    pub fn initialize(&mut self) {
        self.initialize_sales_chart();
        self.initialize_segment_chart();
    }

    /// (Re)create the sales chart, destroying any existing one first
    pub fn initialize_sales_chart(&mut self) {
        if let Some(existing) = self.sales_chart.take() {
            self.surface.destroy(existing.handle);
        }
        let config = ChartConfig::sales();
        let handle = self.surface.create(SALES_CANVAS, &config);
        self.sales_chart = Some(ChartInstance { handle, config });
    }

    /// (Re)create the segment chart, destroying any existing one first
    pub fn initialize_segment_chart(&mut self) {
        if let Some(existing) = self.segment_chart.take() {
            self.surface.destroy(existing.handle);
        }
        let config = ChartConfig::segments(&self.segment_labels);
        let handle = self.surface.create(SEGMENT_CANVAS, &config);
        self.segment_chart = Some(ChartInstance { handle, config });
    }

    /// Append `(month, value)` to the sales chart and redraw it once
    pub fn update_sales_chart(&mut self, month: &str, value: f64) -> Result<(), DashboardError> {
        let chart = self
            .sales_chart
            .as_mut()
            .ok_or(DashboardError::NotInitialized)?;

        tracing::debug!(month = %month, value, "Updating sales chart");
        chart.config.data.push_point(month, value);
        self.surface.update(chart.handle, &chart.config);
        Ok(())
    }

    /// Count one more customer in `segment` and redraw the pie once.
    ///
    /// The pie grows for a segment past the configured labels, but only up
    /// to a fixed number of extra buckets.
    pub fn update_segment_chart(&mut self, segment: usize) -> Result<(), DashboardError> {
        let chart = self
            .segment_chart
            .as_mut()
            .ok_or(DashboardError::NotInitialized)?;

        let max = self.max_segments;
        let known = chart.config.data.values().len();
        let count = chart
            .config
            .data
            .increment_bucket(segment, max)
            .ok_or(DashboardError::SegmentOutOfRange { segment, max })?;
        if segment >= known {
            tracing::warn!(segment, "Segment index beyond known buckets, chart grown");
        }
        tracing::debug!(segment, count, "Updating segment chart");
        self.surface.update(chart.handle, &chart.config);
        Ok(())
    }

    /// Issue a ticket for a request that is about to be sent
    pub fn issue_ticket(&mut self, kind: RequestKind) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        Ticket {
            kind,
            seq,
            request_id: Uuid::new_v4(),
        }
    }

    /// Apply a fulfilled sales prediction.
    ///
    /// The point is always plotted. The latest value only moves forward, so a
    /// slow response for an older submission cannot replace a newer one.
    pub fn apply_sales_prediction(
        &mut self,
        ticket: &Ticket,
        month: &str,
        value: f64,
    ) -> Result<(), DashboardError> {
        self.update_sales_chart(month, value)?;

        if ticket.seq > self.latest_sales_seq {
            self.latest_sales_seq = ticket.seq;
            self.predicted_sales = Some(value);
        } else {
            tracing::debug!(
                request_id = %ticket.request_id,
                "Stale prediction plotted without replacing the latest value"
            );
        }
        self.last_error = None;
        Ok(())
    }

    /// Apply a fulfilled segmentation response
    pub fn apply_customer_segment(
        &mut self,
        ticket: &Ticket,
        segment: u32,
    ) -> Result<(), DashboardError> {
        self.update_segment_chart(segment as usize)?;

        if ticket.seq > self.latest_segment_seq {
            self.latest_segment_seq = ticket.seq;
            self.customer_segment = Some(segment);
        } else {
            tracing::debug!(
                request_id = %ticket.request_id,
                "Stale segment counted without replacing the latest value"
            );
        }
        self.last_error = None;
        Ok(())
    }

    /// Record a failed request so the view can show it
    pub fn record_failure(&mut self, ticket: &Ticket, error: &DashboardError) {
        tracing::error!(
            request_id = %ticket.request_id,
            kind = ?ticket.kind,
            "Request failed: {}",
            error
        );
        self.last_error = Some(StatusMessage {
            message: error.to_string(),
            at: Utc::now(),
        });
    }

    pub fn predicted_sales(&self) -> Option<f64> {
        self.predicted_sales
    }

    pub fn customer_segment(&self) -> Option<u32> {
        self.customer_segment
    }

    pub fn sales_chart(&self) -> Option<&ChartData> {
        self.sales_chart.as_ref().map(|c| &c.config.data)
    }

    pub fn segment_chart(&self) -> Option<&ChartData> {
        self.segment_chart.as_ref().map(|c| &c.config.data)
    }

    pub fn last_error(&self) -> Option<&StatusMessage> {
        self.last_error.as_ref()
    }

    /// Both charts as text, in page order
    pub fn render_text(&self) -> String {
        [
            (SALES_CANVAS, &self.sales_chart),
            (SEGMENT_CANVAS, &self.segment_chart),
        ]
        .into_iter()
        .filter_map(|(canvas, chart)| {
            chart
                .as_ref()
                .map(|c| surface::render_text(canvas, &c.config))
        })
        .collect()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            predicted_sales: self.predicted_sales,
            customer_segment: self.customer_segment,
            sales_chart: self.sales_chart().cloned(),
            segment_chart: self.segment_chart().cloned(),
            last_error: self.last_error.clone(),
        }
    }
}
