//! Full-screen spinner shown while any request is in flight.

use leptos::prelude::*;

use crate::app::Services;

/// Fixed id of the overlay element.
pub const LOADING_OVERLAY_ID: &str = "loading-overlay";

/// Rendered at most once; present iff the in-flight counter is positive.
#[component]
pub fn LoadingOverlay() -> impl IntoView {
    let notices = expect_context::<Services>().notices;
    let visible = move || notices.state.with(|s| s.loading_visible());

    view! {
        <Show when=visible>
            <div id=LOADING_OVERLAY_ID class="spinner-overlay">
                <div class="spinner-border text-primary" role="status">
                    <span class="visually-hidden">"Загрузка..."</span>
                </div>
            </div>
        </Show>
    }
}
