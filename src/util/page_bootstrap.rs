//! One-shot wiring of server-rendered page markup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages are rendered by the server; this module attaches behaviour to the
//! markup once the bundle starts: staggered card entrance, auto-dismissed
//! flash notices, confirmation-gated forms and the DSE delete / Excel export
//! buttons.
//!
//! DESIGN
//! ======
//! Decisions that do not need the DOM (delays, attribute parsing, whether a
//! held submission proceeds) are plain functions so they run under native
//! tests. `install` is the browser-only shell around them.

#[cfg(test)]
#[path = "page_bootstrap_test.rs"]
mod page_bootstrap_test;

use std::cell::Cell;

use crate::state::confirm::Confirm;

pub const CARD_SELECTOR: &str = ".card";
pub const FADE_IN_CLASS: &str = "fade-in";
pub const NOTICE_SELECTOR: &str = ".alert:not(.alert-permanent)";
pub const SHOW_CLASS: &str = "show";
pub const CONFIRM_FORM_SELECTOR: &str = "form[data-confirm]";
pub const CONFIRM_ATTR: &str = "data-confirm";
pub const DSE_DELETE_ATTR: &str = "data-dse-delete";
pub const EXPORT_EXCEL_ATTR: &str = "data-export-excel";

/// What to do with a held form submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed,
    Suppress,
}

/// Entrance delay for the card at `index`.
#[must_use]
pub fn card_entrance_delay(index: u32, step_ms: u32) -> u32 {
    index.saturating_mul(step_ms)
}

/// Ask `prompt` and decide the fate of a held submission.
pub async fn gate_submission<C: Confirm + ?Sized>(confirm: &C, prompt: &str) -> SubmitDecision {
    if confirm.confirm(prompt).await {
        SubmitDecision::Proceed
    } else {
        SubmitDecision::Suppress
    }
}

/// Per-form latch letting exactly one confirmed resubmission through.
///
/// The first submit is held and prompted; once accepted the form is
/// resubmitted through the browser's normal path (validation, submitter
/// `name`/`value`, `formaction`), and that replay must not prompt again.
#[derive(Debug, Default)]
pub struct SubmitGate {
    confirmed: Cell<bool>,
}

impl SubmitGate {
    /// Whether this submit event must be held for confirmation. Consumes a
    /// pending confirmation.
    pub fn should_hold(&self) -> bool {
        !self.confirmed.replace(false)
    }

    /// Let the next submit event pass.
    pub fn confirm(&self) {
        self.confirmed.set(true);
    }

    /// Drop an unconsumed confirmation, e.g. when validation blocked the
    /// resubmission.
    pub fn reset(&self) {
        self.confirmed.set(false);
    }
}

/// Record id carried by a `data-dse-delete` attribute. Blank values carry none.
#[must_use]
pub fn delete_target(attr: Option<&str>) -> Option<String> {
    let id = attr?.trim();
    (!id.is_empty()).then(|| id.to_owned())
}

/// Attach all page behaviours. Call once after the document is interactive.
#[cfg(feature = "csr")]
pub fn install(services: &crate::app::Services) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("page bootstrap skipped: no document");
        return;
    };
    let config = &services.config;
    animate_cards(&document, config.card_stagger_ms);
    dismiss_notices(&document, config.notice_dismiss_ms, config.toast_fade_ms);
    guard_confirm_forms(&document, services.confirm);
    wire_dse_delete(&document, &services.api.dse);
    wire_excel_export(&document, &services.api.export);
}

#[cfg(feature = "csr")]
fn elements(document: &web_sys::Document, selector: &str) -> Vec<web_sys::Element> {
    use wasm_bindgen::JsCast;

    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("invalid selector {selector}");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}

#[cfg(feature = "csr")]
fn animate_cards(document: &web_sys::Document, step_ms: u32) {
    use gloo_timers::callback::Timeout;

    for (index, card) in (0u32..).zip(elements(document, CARD_SELECTOR)) {
        Timeout::new(card_entrance_delay(index, step_ms), move || {
            if let Err(e) = card.class_list().add_1(FADE_IN_CLASS) {
                log::debug!("card fade-in failed: {e:?}");
            }
        })
        .forget();
    }
}

#[cfg(feature = "csr")]
fn dismiss_notices(document: &web_sys::Document, after_ms: u32, fade_ms: u32) {
    use gloo_timers::callback::Timeout;

    let notices = elements(document, NOTICE_SELECTOR);
    if notices.is_empty() {
        return;
    }
    Timeout::new(after_ms, move || {
        for notice in notices {
            if let Err(e) = notice.class_list().remove_1(SHOW_CLASS) {
                log::debug!("notice fade failed: {e:?}");
            }
            Timeout::new(fade_ms, move || notice.remove()).forget();
        }
    })
    .forget();
}

#[cfg(feature = "csr")]
fn guard_confirm_forms(document: &web_sys::Document, confirm: crate::state::confirm::ModalConfirm) {
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    for element in elements(document, CONFIRM_FORM_SELECTOR) {
        let Ok(form) = element.dyn_into::<web_sys::HtmlFormElement>() else {
            continue;
        };
        let gate = Rc::new(SubmitGate::default());
        let target = form.clone();
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            if !gate.should_hold() {
                return;
            }
            ev.prevent_default();
            let submitter = ev.dyn_ref::<web_sys::SubmitEvent>().and_then(web_sys::SubmitEvent::submitter);
            let form = target.clone();
            let gate = Rc::clone(&gate);
            let prompt = form.get_attribute(CONFIRM_ATTR).unwrap_or_default();
            leptos::task::spawn_local(async move {
                if gate_submission(&confirm, &prompt).await == SubmitDecision::Suppress {
                    return;
                }
                gate.confirm();
                let replay = match &submitter {
                    Some(button) => form.request_submit_with_submitter(button),
                    None => form.request_submit(),
                };
                // The replay's submit event fires synchronously; if validation
                // blocked it the latch is still set and must not leak.
                gate.reset();
                if let Err(e) = replay {
                    log::warn!("confirmed form submit failed: {e:?}");
                }
            });
        });
        if let Err(e) = form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref()) {
            log::warn!("cannot guard form: {e:?}");
        }
        handler.forget();
    }
}

#[cfg(feature = "csr")]
fn wire_dse_delete(document: &web_sys::Document, client: &crate::app::DseClient) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    for button in elements(document, &format!("[{DSE_DELETE_ATTR}]")) {
        let Some(id) = delete_target(button.get_attribute(DSE_DELETE_ATTR).as_deref()) else {
            log::debug!("delete button without id skipped");
            continue;
        };
        let client = client.clone();
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            ev.prevent_default();
            let client = client.clone();
            let id = id.clone();
            leptos::task::spawn_local(async move {
                client.delete(&id).await;
            });
        });
        if let Err(e) = button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref()) {
            log::warn!("cannot wire delete button: {e:?}");
        }
        handler.forget();
    }
}

#[cfg(feature = "csr")]
fn wire_excel_export(document: &web_sys::Document, export: &crate::app::Exporter) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    for button in elements(document, &format!("[{EXPORT_EXCEL_ATTR}]")) {
        let export = export.clone();
        let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            ev.prevent_default();
            export.to_excel();
        });
        if let Err(e) = button.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref()) {
            log::warn!("cannot wire excel button: {e:?}");
        }
        handler.forget();
    }
}
