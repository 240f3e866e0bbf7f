//! Chat panel: history, composer and send feedback.
//!
//! SYSTEM CONTEXT
//! ==============
//! History is fetched on mount and after every accepted send; each load
//! replaces the displayed set. The list scrolls to the bottom whenever the
//! message set changes.

#[cfg(test)]
#[path = "chat_panel_test.rs"]
mod chat_panel_test;

use leptos::prelude::*;

use crate::app::Services;
use crate::net::chat::SendResult;
use crate::state::chat::{ChatState, MessageView};

/// Toast text when the server refuses a message without saying why.
pub const SEND_REJECTED_MESSAGE: &str = "Не удалось отправить сообщение";

/// Text to send, or `None` when the composer holds nothing worth sending or a
/// send is already running.
pub fn outgoing_text(input: &str, sending: bool) -> Option<String> {
    let text = input.trim();
    (!sending && !text.is_empty()).then(|| text.to_owned())
}

/// Warning shown for an explicit `success: false`. `None` when accepted.
pub fn rejection_message(result: &SendResult) -> Option<String> {
    if result.accepted() {
        return None;
    }
    Some(
        result
            .error
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| SEND_REJECTED_MESSAGE.to_owned()),
    )
}

#[component]
pub fn ChatPanel(
    /// Element id of the message list.
    #[prop(default = "chat-messages")]
    container_id: &'static str,
    /// Direct-message recipient; `None` posts to the shared chat.
    #[prop(default = None)]
    target_user_id: Option<String>,
) -> impl IntoView {
    let services = expect_context::<Services>();
    let client = StoredValue::new(services.api.chat);
    let target = StoredValue::new(target_user_id);
    let chat = RwSignal::new(ChatState { loading: true, ..ChatState::default() });
    let input = RwSignal::new(String::new());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    #[cfg(feature = "csr")]
    {
        let client = client.get_value();
        leptos::task::spawn_local(async move {
            let messages = client.load_messages().await;
            chat.update(|c| c.replace(messages));
        });
    }

    Effect::new(move || {
        let _ = chat.with(|c| c.messages.len());

        #[cfg(feature = "csr")]
        {
            if let Some(el) = messages_ref.get() {
                el.set_scroll_top(el.scroll_height());
            }
        }
    });

    let do_send = move || {
        let Some(text) = outgoing_text(&input.get_untracked(), chat.with_untracked(|c| c.sending)) else {
            return;
        };
        chat.update(|c| c.sending = true);

        #[cfg(feature = "csr")]
        {
            let client = client.get_value();
            let notices = services.notices;
            let target = target.get_value();
            leptos::task::spawn_local(async move {
                use crate::state::notices::{Notifier, Severity};

                let reply = client.send_message(&text, target.as_deref()).await;
                chat.update(|c| c.sending = false);
                let Some(reply) = reply else {
                    return;
                };
                if let Some(message) = rejection_message(&reply) {
                    notices.show_toast(&message, Severity::Warning);
                    return;
                }
                input.set(String::new());
                let messages = client.load_messages().await;
                chat.update(|c| c.replace(messages));
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (text, target, client);
            chat.update(|c| c.sending = false);
        }
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    view! {
        <div class="chat-panel">
            <div id=container_id class="chat-messages" node_ref=messages_ref>
                {move || {
                    let state = chat.get();
                    if state.loading {
                        return view! { <div class="text-muted text-center">"Загрузка..."</div> }.into_any();
                    }
                    if state.messages.is_empty() {
                        return view! { <div class="text-muted text-center">"Сообщений пока нет"</div> }.into_any();
                    }
                    state
                        .views()
                        .into_iter()
                        .map(|row: MessageView| {
                            let class = row.class();
                            view! {
                                <div class=class>
                                    <div class="message-text">{row.text}</div>
                                    <div class="time">{row.time}</div>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <div class="input-group chat-input">
                <input
                    class="form-control"
                    type="text"
                    placeholder="Введите сообщение..."
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <button
                    type="button"
                    class="btn btn-primary"
                    on:click=move |_| do_send()
                    disabled=move || outgoing_text(&input.get(), chat.with(|c| c.sending)).is_none()
                >
                    "Отправить"
                </button>
            </div>
        </div>
    }
}
