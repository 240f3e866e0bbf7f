//! Loading overlay and toast notifications.
//!
//! DESIGN
//! ======
//! The overlay is a counter of in-flight requests rather than a single DOM
//! node, so overlapping requests cannot hide each other's spinner. Toasts are
//! plain data rendered by `components::toast_stack`; their lifecycle timers
//! only flip flags on [`NoticeState`], and removal is idempotent.

#[cfg(test)]
#[path = "notices_test.rs"]
mod notices_test;

use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;

use crate::config::ClientConfig;

/// Toast severity, mapped onto the Bootstrap `alert-*` palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    Primary,
    Secondary,
    Light,
    Dark,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Inverse of [`Severity::as_str`]. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let severity = match name.trim().to_ascii_lowercase().as_str() {
            "info" => Self::Info,
            "success" => Self::Success,
            "warning" => Self::Warning,
            "danger" | "error" => Self::Danger,
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            "light" => Self::Light,
            "dark" => Self::Dark,
            _ => return None,
        };
        Some(severity)
    }
}

/// A transient notification banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    /// Cleared when the fade-out starts; the toast is detached shortly after.
    pub visible: bool,
}

impl Toast {
    /// CSS classes for the rendered banner.
    #[must_use]
    pub fn class(&self) -> String {
        let show = if self.visible { " show" } else { "" };
        format!("alert alert-{} alert-dismissible fade{show}", self.severity.as_str())
    }
}

/// Overlay counter plus the live toast list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    /// Requests currently holding the loading overlay.
    pub in_flight: u32,
    pub toasts: Vec<Toast>,
    pub next_toast_id: u64,
}

impl NoticeState {
    pub fn begin_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
    }

    /// Release one overlay hold. No-op when nothing is in flight.
    pub fn end_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    #[must_use]
    pub fn loading_visible(&self) -> bool {
        self.in_flight > 0
    }

    /// Append a visible toast and return its id.
    pub fn push_toast(&mut self, message: &str, severity: Severity) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast { id, message: message.to_owned(), severity, visible: true });
        id
    }

    /// Start the fade-out of a toast. Returns false if it is already gone.
    pub fn fade_toast(&mut self, id: u64) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) => {
                toast.visible = false;
                true
            }
            None => false,
        }
    }

    /// Current classes of a toast, `None` once it is detached.
    #[must_use]
    pub fn toast_class(&self, id: u64) -> Option<String> {
        self.toasts.iter().find(|t| t.id == id).map(Toast::class)
    }

    /// Detach a toast. Returns false if it was already removed.
    pub fn remove_toast(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }
}

/// User-facing notification sink used by the HTTP and service layers.
pub trait Notifier {
    fn show_loading(&self);
    fn hide_loading(&self);
    fn show_toast(&self, message: &str, severity: Severity);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn show_loading(&self) {
        (**self).show_loading();
    }
    fn hide_loading(&self) {
        (**self).hide_loading();
    }
    fn show_toast(&self, message: &str, severity: Severity) {
        (**self).show_toast(message, severity);
    }
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn show_loading(&self) {
        (**self).show_loading();
    }
    fn hide_loading(&self) {
        (**self).hide_loading();
    }
    fn show_toast(&self, message: &str, severity: Severity) {
        (**self).show_toast(message, severity);
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn show_loading(&self) {
        (**self).show_loading();
    }
    fn hide_loading(&self) {
        (**self).hide_loading();
    }
    fn show_toast(&self, message: &str, severity: Severity) {
        (**self).show_toast(message, severity);
    }
}

/// Scoped overlay hold: shows on acquire, hides on drop, including early
/// returns and error paths.
#[must_use = "the overlay is hidden as soon as the guard is dropped"]
pub struct LoadingGuard<'a, N: Notifier + ?Sized> {
    notifier: &'a N,
}

impl<'a, N: Notifier + ?Sized> LoadingGuard<'a, N> {
    pub fn acquire(notifier: &'a N) -> Self {
        notifier.show_loading();
        Self { notifier }
    }
}

impl<N: Notifier + ?Sized> Drop for LoadingGuard<'_, N> {
    fn drop(&mut self) {
        self.notifier.hide_loading();
    }
}

/// Toast lifecycle timings in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastTimings {
    pub visible_ms: u32,
    pub fade_ms: u32,
}

impl From<&ClientConfig> for ToastTimings {
    fn from(config: &ClientConfig) -> Self {
        Self { visible_ms: config.toast_visible_ms, fade_ms: config.toast_fade_ms }
    }
}

/// Reactive [`Notifier`] backing the overlay and toast components.
#[derive(Clone, Copy, Debug)]
pub struct NoticeBoard {
    pub state: RwSignal<NoticeState>,
    timings: ToastTimings,
}

impl NoticeBoard {
    pub fn new(state: RwSignal<NoticeState>, timings: ToastTimings) -> Self {
        Self { state, timings }
    }

    #[must_use]
    pub fn timings(&self) -> ToastTimings {
        self.timings
    }

    /// Fade then detach a toast, the same path the auto-dismiss timer takes.
    pub fn dismiss(&self, id: u64) {
        if self.state.try_update(|s| s.fade_toast(id)) != Some(true) {
            return;
        }
        #[cfg(feature = "csr")]
        {
            let state = self.state;
            let fade_ms = self.timings.fade_ms;
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(fade_ms))).await;
                state.try_update(|s| s.remove_toast(id));
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            self.state.try_update(|s| s.remove_toast(id));
        }
    }

    #[cfg(feature = "csr")]
    fn schedule_auto_dismiss(&self, id: u64) {
        let board = *self;
        let visible_ms = self.timings.visible_ms;
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(visible_ms))).await;
            board.dismiss(id);
        });
    }
}

impl Notifier for NoticeBoard {
    fn show_loading(&self) {
        self.state.update(NoticeState::begin_loading);
    }

    fn hide_loading(&self) {
        self.state.update(NoticeState::end_loading);
    }

    fn show_toast(&self, message: &str, severity: Severity) {
        let Some(id) = self.state.try_update(|s| s.push_toast(message, severity)) else {
            return;
        };
        #[cfg(feature = "csr")]
        self.schedule_auto_dismiss(id);
        #[cfg(not(feature = "csr"))]
        leptos::logging::log!("toast #{id} [{}]: {message}", severity.as_str());
    }
}
