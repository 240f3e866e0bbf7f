//! Deferred user confirmation.
//!
//! DESIGN
//! ======
//! `confirm` returns a future instead of blocking the main thread. Callers
//! run the guarded action only when it resolves to `true`; a dismissed or
//! superseded prompt resolves to `false`.

#[cfg(test)]
#[path = "confirm_test.rs"]
mod confirm_test;

use std::rc::Rc;
use std::sync::Arc;

use futures::channel::oneshot;
use leptos::prelude::*;

/// Asks the user to accept or decline an action.
#[allow(async_fn_in_trait)]
pub trait Confirm {
    async fn confirm(&self, message: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for Rc<C> {
    async fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message).await
    }
}

impl<C: Confirm + ?Sized> Confirm for Arc<C> {
    async fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message).await
    }
}

/// An open prompt waiting for the modal's answer.
#[derive(Debug)]
pub struct PendingConfirm {
    pub message: String,
    reply: oneshot::Sender<bool>,
}

/// Modal confirmation state rendered by `components::confirm_dialog`.
#[derive(Debug, Default)]
pub struct ConfirmState {
    pub pending: Option<PendingConfirm>,
}

impl ConfirmState {
    /// Open a prompt. A prompt that is still open is declined first.
    pub fn open(&mut self, message: &str) -> oneshot::Receiver<bool> {
        self.resolve(false);
        let (reply, answer) = oneshot::channel();
        self.pending = Some(PendingConfirm { message: message.to_owned(), reply });
        answer
    }

    /// Answer the open prompt, if any.
    pub fn resolve(&mut self, accepted: bool) {
        if let Some(pending) = self.pending.take() {
            // The asking future may already be gone; nothing to deliver then.
            if pending.reply.send(accepted).is_err() {
                leptos::logging::warn!("confirmation answered after caller went away");
            }
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.message.as_str())
    }
}

/// [`Confirm`] backed by the in-page modal.
#[derive(Clone, Copy, Debug)]
pub struct ModalConfirm {
    pub state: RwSignal<ConfirmState>,
}

impl ModalConfirm {
    pub fn new(state: RwSignal<ConfirmState>) -> Self {
        Self { state }
    }
}

impl Confirm for ModalConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let Some(answer) = self.state.try_update(|s| s.open(message)) else {
            return false;
        };
        answer.await.unwrap_or(false)
    }
}
