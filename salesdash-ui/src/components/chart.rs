//! Chart Components
//!
//! Sales line chart and customer segment pie chart on HTML5 Canvas. Each
//! component owns one canvas and redraws it in place whenever its signal
//! changes, so a canvas never carries more than one chart.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::global::{GlobalState, SEGMENT_LABELS};

/// Sales line colour
const LINE_COLOR: &str = "blue";
/// Bucket colours, cycled past the third bucket
const SEGMENT_COLORS: [&str; 3] = ["red", "green", "blue"];
/// Curve tension of the sales line
const TENSION: f64 = 0.3;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 50.0;

/// Predicted sales per submitted month
#[component]
pub fn SalesChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let points = state.sales_points.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_line_chart(&canvas, &points);
        }
    });

    view! {
        <canvas
            node_ref=canvas_ref
            width="800"
            height="400"
            class="w-full h-64 md:h-96 rounded-lg"
        />
    }
}

/// Customers per segment
#[component]
pub fn SegmentChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let counts = state.segment_counts.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_pie_chart(&canvas, &counts);
        }
    });

    view! {
        <div>
            <canvas
                node_ref=canvas_ref
                width="400"
                height="400"
                class="w-full max-w-sm mx-auto rounded-lg"
            />
            <div class="flex justify-center flex-wrap gap-4 mt-4">
                {move || {
                    state.segment_counts.get()
                        .into_iter()
                        .enumerate()
                        .map(|(idx, count)| {
                            view! {
                                <div class="flex items-center space-x-2">
                                    <div
                                        class="w-3 h-3 rounded-full"
                                        style=format!("background-color: {}", segment_color(idx))
                                    />
                                    <span class="text-sm text-gray-300">
                                        {format!("{} ({})", segment_label(idx), count)}
                                    </span>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
        </div>
    }
}

fn segment_color(idx: usize) -> &'static str {
    SEGMENT_COLORS[idx % SEGMENT_COLORS.len()]
}

fn segment_label(idx: usize) -> String {
    SEGMENT_LABELS
        .get(idx)
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("Segment {}", idx))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Upper bound of the y axis (which always starts at zero)
fn y_max(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Canvas coordinates of each point, evenly spaced along x
fn line_points(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let top = y_max(values);
    let step = if values.len() > 1 {
        chart_width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = if values.len() > 1 {
                MARGIN_LEFT + i as f64 * step
            } else {
                MARGIN_LEFT + chart_width / 2.0
            };
            let y = MARGIN_TOP + (1.0 - value / top) * chart_height;
            (x, y)
        })
        .collect()
}

/// Start and end angle of each slice, starting at twelve o'clock
fn pie_slices(counts: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = -std::f64::consts::FRAC_PI_2;
    counts
        .iter()
        .map(|count| {
            let start = angle;
            angle += count / total * std::f64::consts::TAU;
            (start, angle)
        })
        .collect()
}

fn draw_line_chart(canvas: &HtmlCanvasElement, points: &[(String, f64)]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let top = y_max(&values);

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let y = MARGIN_TOP + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = top - (i as f64 / 5.0) * top;
        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    // Axis titles
    let _ = ctx.fill_text("Month", width / 2.0 - 20.0, height - 8.0);
    let _ = ctx.fill_text("Sales", 5.0, MARGIN_TOP - 6.0);

    if points.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No predictions yet", width / 2.0 - 70.0, height / 2.0);
        return;
    }

    let coords = line_points(&values, width, height);

    // Cardinal spline through the points
    ctx.set_stroke_style(&LINE_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(coords[0].0, coords[0].1);
    for i in 1..coords.len() {
        let p0 = coords[i - 1];
        let p1 = coords[i];
        let prev = if i >= 2 { coords[i - 2] } else { p0 };
        let next = coords.get(i + 1).copied().unwrap_or(p1);

        let cp1 = (p0.0 + (p1.0 - prev.0) * TENSION / 2.0, p0.1 + (p1.1 - prev.1) * TENSION / 2.0);
        let cp2 = (p1.0 - (next.0 - p0.0) * TENSION / 2.0, p1.1 - (next.1 - p0.1) * TENSION / 2.0);
        ctx.bezier_curve_to(cp1.0, cp1.1, cp2.0, cp2.1, p1.0, p1.1);
    }
    ctx.stroke();

    // Points and month labels
    ctx.set_font("12px sans-serif");
    for ((label, _), (x, y)) in points.iter().zip(&coords) {
        ctx.set_fill_style(&LINE_COLOR.into());
        ctx.begin_path();
        let _ = ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::TAU);
        ctx.fill();

        ctx.set_fill_style(&"#9ca3af".into());
        let _ = ctx.fill_text(label, x - 4.0, height - MARGIN_BOTTOM + 18.0);
    }
}

fn draw_pie_chart(canvas: &HtmlCanvasElement, counts: &[f64]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 2.0 - 10.0;

    ctx.clear_rect(0.0, 0.0, width, height);

    let slices = pie_slices(counts);
    if slices.is_empty() {
        ctx.set_stroke_style(&"#374151".into());
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
        ctx.stroke();
        return;
    }

    for (idx, (start, end)) in slices.into_iter().enumerate() {
        if end <= start {
            continue;
        }
        ctx.set_fill_style(&segment_color(idx).into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();
        ctx.fill();
    }
}
