//! Chart Model
//!
//! Chart descriptions the dashboard mutates and hands to a
//! [`ChartSurface`](super::ChartSurface) for drawing. A chart is a label
//! sequence plus one or more datasets holding one value per label.

use serde::Serialize;

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Pie,
}

/// One data series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub background_colors: Vec<String>,
    pub border_width: f64,
    pub fill: bool,
    /// Bezier curve tension for line charts (0 = straight segments)
    pub tension: f64,
}

impl Dataset {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: Vec::new(),
            border_color: None,
            background_colors: Vec::new(),
            border_width: 1.0,
            fill: false,
            tension: 0.0,
        }
    }
}

/// Labels plus datasets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// The primary (first) dataset's values
    pub fn values(&self) -> &[f64] {
        self.datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    /// Append a labelled point to the primary dataset
    pub fn push_point(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        if let Some(dataset) = self.datasets.first_mut() {
            dataset.data.push(value);
        }
    }

    /// Add one to bucket `index` of the primary dataset and return the new
    /// count. Buckets past the end are created with a zero count first, up
    /// to `max_buckets`; an index at or beyond that returns `None` and
    /// leaves the data untouched.
    pub fn increment_bucket(&mut self, index: usize, max_buckets: usize) -> Option<f64> {
        if index >= max_buckets {
            return None;
        }
        let dataset = self.datasets.first_mut()?;

        if index >= dataset.data.len() {
            dataset.data.resize(index + 1, 0.0);
        }
        while self.labels.len() < dataset.data.len() {
            self.labels.push(format!("Segment {}", self.labels.len()));
        }

        dataset.data[index] += 1.0;
        Some(dataset.data[index])
    }
}

/// Axis title and scaling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisOptions {
    pub title: String,
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisOptions>,
}

/// Complete chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Bucket colours for the segment chart, cycled past the third bucket
pub const SEGMENT_COLORS: [&str; 3] = ["red", "green", "blue"];

/// Buckets a segment chart always starts with
pub const MIN_SEGMENTS: usize = 3;

/// How far a segment chart may grow past its starting buckets
pub const EXTRA_SEGMENT_LIMIT: usize = 8;

/// Starting bucket labels: `labels`, padded with "Segment N" up to
/// [`MIN_SEGMENTS`]
pub fn segment_labels(labels: &[String]) -> Vec<String> {
    let mut labels = labels.to_vec();
    while labels.len() < MIN_SEGMENTS {
        labels.push(format!("Segment {}", labels.len()));
    }
    labels
}

impl ChartConfig {
    /// Empty "Predicted Sales" line chart, month on x, sales on y
    pub fn sales() -> Self {
        let dataset = Dataset {
            border_color: Some("blue".to_string()),
            border_width: 2.0,
            fill: false,
            tension: 0.3,
            ..Dataset::new("Predicted Sales")
        };

        Self {
            kind: ChartKind::Line,
            data: ChartData {
                labels: Vec::new(),
                datasets: vec![dataset],
            },
            options: ChartOptions {
                responsive: true,
                x_axis: Some(AxisOptions {
                    title: "Month".to_string(),
                    begin_at_zero: false,
                }),
                y_axis: Some(AxisOptions {
                    title: "Sales".to_string(),
                    begin_at_zero: true,
                }),
            },
        }
    }

    /// "Customer Segments" pie chart with one zeroed bucket per label, and
    /// never fewer than [`MIN_SEGMENTS`] buckets
    pub fn segments(labels: &[String]) -> Self {
        let labels = segment_labels(labels);
        let dataset = Dataset {
            data: vec![0.0; labels.len()],
            background_colors: (0..labels.len())
                .map(|i| SEGMENT_COLORS[i % SEGMENT_COLORS.len()].to_string())
                .collect(),
            ..Dataset::new("Customer Segments")
        };

        Self {
            kind: ChartKind::Pie,
            data: ChartData {
                labels,
                datasets: vec![dataset],
            },
            options: ChartOptions {
                responsive: true,
                x_axis: None,
                y_axis: None,
            },
        }
    }
}
