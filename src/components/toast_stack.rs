//! Dismissible toast notifications.

use leptos::prelude::*;

use crate::app::Services;
use crate::state::notices::Toast;

/// Toasts stacked in the top-right corner, newest last.
///
/// Rows are keyed by id only; the fade flips classes on the mounted node so
/// the `.fade` transition runs before the row is detached.
#[component]
pub fn ToastStack() -> impl IntoView {
    let notices = expect_context::<Services>().notices;
    let toasts = move || notices.state.with(|s| s.toasts.clone());

    view! {
        <div class="toast-container position-fixed top-0 end-0 p-3">
            <For
                each=toasts
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    let class = move || notices.state.with(|s| s.toast_class(id).unwrap_or_default());
                    view! {
                        <div class=class role="alert">
                            {toast.message}
                            <button
                                type="button"
                                class="btn-close"
                                aria-label="Close"
                                on:click=move |_| notices.dismiss(id)
                            ></button>
                        </div>
                    }
                }
            />
        </div>
    }
}
