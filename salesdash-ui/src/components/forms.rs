//! Input Forms
//!
//! Month and customer-feature forms. Input is validated before anything is
//! sent; a response is folded into the charts when it arrives.

use leptos::*;

use crate::api;
use crate::state::global::GlobalState;
use crate::validate;

/// Month form driving the sales chart
#[component]
pub fn PredictionForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (month, set_month) = create_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let month = match validate::parse_month(&month.get()) {
            Ok(month) => month,
            Err(e) => {
                web_sys::console::error_1(&e.clone().into());
                state.show_error(&e);
                return;
            }
        };

        let seq = state.begin_request();
        spawn_local(async move {
            match api::predict_sales(month).await {
                Ok(value) => {
                    web_sys::console::log_1(
                        &format!("Sales prediction for month {}: {}", month, value).into(),
                    );
                    state.apply_prediction(seq, month, value);
                    state.show_success(&format!("Month {}: {:.1} predicted", month, value));
                }
                Err(e) => state.fail_request(&e),
            }
        });
    };

    view! {
        <form on:submit=on_submit class="flex items-end space-x-3">
            <label class="flex-1">
                <span class="block text-sm text-gray-400 mb-1">"Month (1-12)"</span>
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="6"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2"
                    prop:value=month
                    on:input=move |ev| set_month.set(event_target_value(&ev))
                />
            </label>
            <button
                type="submit"
                class="bg-primary-600 hover:bg-primary-700 rounded-lg px-4 py-2 font-semibold"
            >
                "Predict Sales"
            </button>
        </form>
        <p class="text-sm text-gray-400 mt-2">
            {move || {
                state.predicted_sales.get()
                    .map(|v| format!("Predicted sales: {:.1}", v))
                    .unwrap_or_else(|| "No prediction yet".to_string())
            }}
        </p>
    }
}

/// Feature form driving the segment chart
#[component]
pub fn SegmentForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (features, set_features) = create_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let features = match validate::parse_features(&features.get()) {
            Ok(features) => features,
            Err(e) => {
                web_sys::console::error_1(&e.clone().into());
                state.show_error(&e);
                return;
            }
        };

        let seq = state.begin_request();
        spawn_local(async move {
            match api::segment_customers(&features).await {
                Ok(segment) => {
                    web_sys::console::log_1(&format!("Customer segment: {}", segment).into());
                    if state.apply_segment(seq, segment) {
                        state.show_success(&format!("Customer is in segment {}", segment));
                    }
                }
                Err(e) => state.fail_request(&e),
            }
        });
    };

    view! {
        <form on:submit=on_submit class="flex items-end space-x-3">
            <label class="flex-1">
                <span class="block text-sm text-gray-400 mb-1">
                    "Features (age, annual income, spending score)"
                </span>
                <input
                    type="text"
                    placeholder="25, 40000, 30"
                    class="w-full bg-gray-700 rounded-lg px-3 py-2"
                    prop:value=features
                    on:input=move |ev| set_features.set(event_target_value(&ev))
                />
            </label>
            <button
                type="submit"
                class="bg-primary-600 hover:bg-primary-700 rounded-lg px-4 py-2 font-semibold"
            >
                "Segment Customer"
            </button>
        </form>
        <p class="text-sm text-gray-400 mt-2">
            {move || {
                state.customer_segment.get()
                    .map(|s| format!("Customer segment: {}", s))
                    .unwrap_or_else(|| "No segment yet".to_string())
            }}
        </p>
    }
}
