//! Toast Notification Component
//!
//! Shows success and error messages.

use leptos::*;

use crate::state::global::GlobalState;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed bottom-20 right-4 z-50 space-y-2">
            {move || {
                state.success.get().map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Success />
                })
            }}

            {move || {
                state.error.get().map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Error />
                })
            }}
        </div>
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ToastVariant {
    Success,
    Error,
}

impl ToastVariant {
    /// Icon and background class
    fn style(self) -> (&'static str, &'static str) {
        match self {
            ToastVariant::Success => ("✓", "bg-green-600"),
            ToastVariant::Error => ("✕", "bg-red-600"),
        }
    }
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    variant: ToastVariant,
) -> impl IntoView {
    let (icon, bg_class) = variant.style();

    view! {
        <div class=format!(
            "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{message}</span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_are_distinct() {
        let (success_icon, success_bg) = ToastVariant::Success.style();
        let (error_icon, error_bg) = ToastVariant::Error.style();
        assert_ne!(success_icon, error_icon);
        assert_eq!(success_bg, "bg-green-600");
        assert_eq!(error_bg, "bg-red-600");
    }
}
