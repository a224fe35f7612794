//! App Root Component
//!
//! Dashboard page: two forms, two charts, one toast area.

use leptos::*;

use crate::api;
use crate::components::{PredictionForm, SalesChart, SegmentChart, SegmentForm, Toast};
use crate::state::global::{provide_global_state, GlobalState, DEMO_FLAG_KEY};

/// Delay before the sample update sequence runs
const DEMO_DELAY_MS: u32 = 1000;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    if api::local_flag(DEMO_FLAG_KEY) {
        gloo_timers::callback::Timeout::new(DEMO_DELAY_MS, move || state.run_demo()).forget();
    }

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <main class="flex-1 container mx-auto px-4 py-8 pb-24 space-y-8">
                <div class="flex items-center justify-between">
                    <div>
                        <h1 class="text-3xl font-bold">"Sales Dashboard"</h1>
                        <p class="text-gray-400 mt-1">"Sales forecast and customer segments"</p>
                    </div>
                    <button
                        class="px-4 py-2 rounded-lg text-sm bg-gray-700 hover:bg-gray-600"
                        on:click=move |_| state.reset_charts()
                    >
                        "Reset charts"
                    </button>
                </div>

                <div class="grid md:grid-cols-2 gap-8">
                    <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                        <h2 class="text-xl font-semibold">"Sales Prediction"</h2>
                        <PredictionForm />
                        <SalesChart />
                    </section>

                    <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                        <h2 class="text-xl font-semibold">"Customer Segments"</h2>
                        <SegmentForm />
                        <SegmentChart />
                    </section>
                </div>
            </main>

            <Footer />
            <Toast />
        </div>
    }
}

/// Footer with backend address and request activity
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let api_base = api::get_api_base();

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <span class="text-gray-400">{format!("Backend: {}", api_base)}</span>
                {move || {
                    let pending = state.in_flight.get();
                    if pending > 0 {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>{format!("{} request(s) pending", pending)}</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}
