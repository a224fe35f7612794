//! Salesdash Dashboard
//!
//! Sales prediction and customer segmentation dashboard built with Leptos (WASM).
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the prediction backend over HTTP and draws both
//! charts on HTML5 canvases.

use leptos::*;

mod api;
mod app;
mod components;
mod state;
mod validate;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
