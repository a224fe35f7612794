//! Chart Surfaces
//!
//! A surface is whatever a chart is drawn on. The dashboard creates one chart
//! per canvas, asks for a redraw after every mutation, and destroys the old
//! chart before re-creating it on the same canvas.

use std::collections::HashMap;
use std::io::Write;

use super::chart::{ChartConfig, ChartKind};

/// Opaque id of a chart attached to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// Rendering backend for dashboard charts
pub trait ChartSurface: Send {
    /// Attach a new chart to `canvas` and draw it
    fn create(&mut self, canvas: &str, config: &ChartConfig) -> ChartHandle;

    /// Redraw an attached chart from its current data
    fn update(&mut self, handle: ChartHandle, config: &ChartConfig);

    /// Detach a chart; the handle is dead afterwards
    fn destroy(&mut self, handle: ChartHandle);
}

/// Width of the longest bar in characters
const BAR_WIDTH: usize = 40;

/// Plain-text chart renderer for terminals
pub struct TerminalSurface<W> {
    out: W,
    next_handle: u64,
    canvases: HashMap<ChartHandle, String>,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_handle: 1,
            canvases: HashMap::new(),
        }
    }

    /// Number of charts currently attached
    pub fn attached(&self) -> usize {
        self.canvases.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, handle: ChartHandle, config: &ChartConfig) {
        let canvas = self
            .canvases
            .get(&handle)
            .cloned()
            .unwrap_or_else(|| "?".to_string());
        let text = render_text(&canvas, config);
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(canvas = %canvas, "Failed to draw chart: {}", e);
        }
    }
}

impl<W: Write + Send> ChartSurface for TerminalSurface<W> {
    fn create(&mut self, canvas: &str, config: &ChartConfig) -> ChartHandle {
        let handle = ChartHandle(self.next_handle);
        self.next_handle += 1;
        self.canvases.insert(handle, canvas.to_string());
        self.draw(handle, config);
        handle
    }

    fn update(&mut self, handle: ChartHandle, config: &ChartConfig) {
        if self.canvases.contains_key(&handle) {
            self.draw(handle, config);
        } else {
            tracing::warn!(handle = handle.0, "Redraw requested for a destroyed chart");
        }
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.canvases.remove(&handle);
    }
}

/// Render a chart as text: one bar per label for line charts, one bar with
/// its share of the total per bucket for pie charts.
pub fn render_text(canvas: &str, config: &ChartConfig) -> String {
    let title = config
        .data
        .datasets
        .first()
        .map(|d| d.label.as_str())
        .unwrap_or(canvas);
    let values = config.data.values();

    let mut text = format!("== {} ==\n", title);

    if values.is_empty() {
        text.push_str("  (no data)\n");
        return text;
    }

    let label_width = config
        .data
        .labels
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(0)
        .max(1);

    match config.kind {
        ChartKind::Line => {
            let max = values.iter().cloned().fold(0.0_f64, f64::max);
            for (label, value) in config.data.labels.iter().zip(values) {
                text.push_str(&format!(
                    "  {:>width$} | {} {:.1}\n",
                    label,
                    bar(*value, max),
                    value,
                    width = label_width
                ));
            }
        }
        ChartKind::Pie => {
            let total: f64 = values.iter().sum();
            for (label, value) in config.data.labels.iter().zip(values) {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                text.push_str(&format!(
                    "  {:<width$} | {} {} ({:.0}%)\n",
                    label,
                    bar(*value, total),
                    value,
                    share,
                    width = label_width
                ));
            }
        }
    }

    text
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.clamp(1, BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_line_chart() {
        let text = render_text("sales", &ChartConfig::sales());
        assert_eq!(text, "== Predicted Sales ==\n  (no data)\n");
    }

    #[test]
    fn test_render_line_chart() {
        let mut config = ChartConfig::sales();
        config.data.push_point("6", 4200.0);
        config.data.push_point("12", 2100.0);

        let text = render_text("sales", &config);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("   6 | "));
        assert!(lines[1].ends_with("4200.0"));
        assert_eq!(lines[1].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_render_pie_chart_shares() {
        let labels = vec!["A".to_string(), "B".to_string()];
        let mut config = ChartConfig::segments(&labels);
        for bucket in [0, 0, 0, 1] {
            config.data.increment_bucket(bucket, 3);
        }

        let text = render_text("segments", &config);
        assert!(text.contains("(75%)"));
        assert!(text.contains("(25%)"));
    }

    #[test]
    fn test_terminal_surface_lifecycle() {
        let mut surface = TerminalSurface::new(Vec::new());
        let config = ChartConfig::sales();

        let first = surface.create("sales", &config);
        surface.destroy(first);
        let second = surface.create("sales", &config);

        assert_ne!(first, second);
        assert_eq!(surface.attached(), 1);

        // Dead handles are ignored
        surface.update(first, &config);

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(output.matches("== Predicted Sales ==").count(), 2);
    }
}
