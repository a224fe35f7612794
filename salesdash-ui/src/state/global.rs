//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

/// Pie chart bucket labels
pub const SEGMENT_LABELS: [&str; 3] = ["Segment 0", "Segment 1", "Segment 2"];

/// Buckets the segment chart may grow past [`SEGMENT_LABELS`]
pub const EXTRA_SEGMENT_LIMIT: usize = 8;

/// Local storage flag that enables the sample update sequence
pub const DEMO_FLAG_KEY: &str = "salesdash_demo";

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Sales chart points as (month label, predicted sales)
    pub sales_points: RwSignal<Vec<(String, f64)>>,
    /// Customer count per segment
    pub segment_counts: RwSignal<Vec<f64>>,
    /// Latest predicted sales value
    pub predicted_sales: RwSignal<Option<f64>>,
    /// Latest customer segment
    pub customer_segment: RwSignal<Option<u32>>,
    /// Requests currently in flight
    pub in_flight: RwSignal<usize>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    next_seq: StoredValue<u64>,
    latest_sales_seq: StoredValue<u64>,
    latest_segment_seq: StoredValue<u64>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState::new());
}

/// Count one customer in bucket `segment`, growing `counts` up to the
/// bucket limit. Returns `false`, leaving `counts` alone, past the limit.
fn count_segment(counts: &mut Vec<f64>, segment: usize) -> bool {
    if segment >= SEGMENT_LABELS.len() + EXTRA_SEGMENT_LIMIT {
        return false;
    }
    if segment >= counts.len() {
        counts.resize(segment + 1, 0.0);
    }
    counts[segment] += 1.0;
    true
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            sales_points: create_rw_signal(Vec::new()),
            segment_counts: create_rw_signal(vec![0.0; SEGMENT_LABELS.len()]),
            predicted_sales: create_rw_signal(None),
            customer_segment: create_rw_signal(None),
            in_flight: create_rw_signal(0),
            error: create_rw_signal(None),
            success: create_rw_signal(None),
            next_seq: store_value(1),
            latest_sales_seq: store_value(0),
            latest_segment_seq: store_value(0),
        }
    }

    /// Empty both charts
    pub fn reset_charts(&self) {
        self.sales_points.set(Vec::new());
        self.segment_counts.set(vec![0.0; SEGMENT_LABELS.len()]);
    }

    /// Append a point to the sales chart
    pub fn push_sales_point(&self, month: impl Into<String>, value: f64) {
        let month = month.into();
        self.sales_points.update(|points| points.push((month, value)));
    }

    /// Count one more customer in `segment`, growing the buckets if needed.
    /// Returns `false` for a segment past the bucket limit.
    pub fn increment_segment(&self, segment: usize) -> bool {
        let mut counted = false;
        self.segment_counts.update(|counts| counted = count_segment(counts, segment));
        counted
    }

    /// Sequence number for a request about to be sent
    pub fn begin_request(&self) -> u64 {
        let seq = self.next_seq.get_value();
        self.next_seq.set_value(seq + 1);
        self.in_flight.update(|n| *n += 1);
        seq
    }

    fn finish_request(&self) {
        self.in_flight.update(|n| *n = n.saturating_sub(1));
    }

    /// Plot a prediction; only a newer submission replaces the latest value
    pub fn apply_prediction(&self, seq: u64, month: u8, value: f64) {
        self.finish_request();
        self.push_sales_point(month.to_string(), value);
        if seq > self.latest_sales_seq.get_value() {
            self.latest_sales_seq.set_value(seq);
            self.predicted_sales.set(Some(value));
        }
        self.error.set(None);
    }

    /// Count a segment; only a newer submission replaces the latest value.
    /// A segment past the bucket limit fails the request instead and
    /// returns `false`.
    pub fn apply_segment(&self, seq: u64, segment: u32) -> bool {
        if !self.increment_segment(segment as usize) {
            self.fail_request(&format!(
                "Backend returned segment {}, the chart holds at most {} buckets",
                segment,
                SEGMENT_LABELS.len() + EXTRA_SEGMENT_LIMIT
            ));
            return false;
        }
        self.finish_request();
        if seq > self.latest_segment_seq.get_value() {
            self.latest_segment_seq.set_value(seq);
            self.customer_segment.set(Some(segment));
        }
        self.error.set(None);
        true
    }

    /// A request failed; charts stay as they were
    pub fn fail_request(&self, message: &str) {
        self.finish_request();
        web_sys::console::error_1(&message.into());
        self.show_error(message);
    }

    /// Push the sample point and one count per segment
    pub fn run_demo(&self) {
        self.push_sales_point("0", 0.0);
        for segment in 0..SEGMENT_LABELS.len() {
            self.increment_segment(segment);
        }
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
