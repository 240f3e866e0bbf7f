//! Modal answering [`crate::state::confirm::ModalConfirm`] prompts.

use leptos::prelude::*;

use crate::app::Services;

#[component]
pub fn ConfirmDialog() -> impl IntoView {
    let confirm = expect_context::<Services>().confirm;
    let message = move || confirm.state.with(|s| s.message().map(str::to_owned));
    let answer = move |accepted: bool| confirm.state.update(|s| s.resolve(accepted));

    view! {
        <Show when=move || message().is_some()>
            <div class="modal-backdrop fade show"></div>
            <div class="modal fade show d-block" tabindex="-1" role="dialog" aria-modal="true">
                <div class="modal-dialog modal-dialog-centered">
                    <div class="modal-content">
                        <div class="modal-header">
                            <h5 class="modal-title">"Подтверждение"</h5>
                        </div>
                        <div class="modal-body">{move || message().unwrap_or_default()}</div>
                        <div class="modal-footer">
                            <button type="button" class="btn btn-secondary" on:click=move |_| answer(false)>
                                "Отмена"
                            </button>
                            <button type="button" class="btn btn-danger" on:click=move |_| answer(true)>
                                "Подтвердить"
                            </button>
                        </div>
                    </div>
                </div>
            </div>
        </Show>
    }
}
