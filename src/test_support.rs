//! In-memory stand-ins for the browser seams, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::net::error::RequestError;
use crate::net::transport::{HttpRequest, HttpResponse, Transport};
use crate::state::chat::{ChatSurface, MessageView};
use crate::state::confirm::Confirm;
use crate::state::notices::{Notifier, Severity};
use crate::util::browser::{DownloadFile, Downloader, Navigator};

/// Notifier that records overlay depth and every toast.
#[derive(Default)]
pub struct RecordingNotifier {
    pub in_flight: Cell<u32>,
    pub shows: Cell<u32>,
    pub hides: Cell<u32>,
    pub toasts: RefCell<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn toasts_with(&self, severity: Severity) -> Vec<String> {
        self.toasts
            .borrow()
            .iter()
            .filter(|(_, s)| *s == severity)
            .map(|(m, _)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show_loading(&self) {
        self.shows.set(self.shows.get() + 1);
        self.in_flight.set(self.in_flight.get() + 1);
    }
    fn hide_loading(&self) {
        self.hides.set(self.hides.get() + 1);
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
    }
    fn show_toast(&self, message: &str, severity: Severity) {
        self.toasts.borrow_mut().push((message.to_owned(), severity));
    }
}

/// Transport replaying queued responses and recording requests.
///
/// When an observer is attached, the overlay depth is sampled at dispatch.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, RequestError>>>,
    pub sent: RefCell<Vec<HttpRequest>>,
    observer: Option<Rc<RecordingNotifier>>,
    pub overlay_samples: RefCell<Vec<u32>>,
}

impl FakeTransport {
    pub fn observing(notifier: Rc<RecordingNotifier>) -> Self {
        Self { observer: Some(notifier), ..Self::default() }
    }

    pub fn push(&self, response: Result<HttpResponse, RequestError>) -> &Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub fn push_json(&self, status: u16, body: &serde_json::Value) -> &Self {
        self.push(Ok(json_response(status, body)))
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn last_sent(&self) -> Option<HttpRequest> {
        self.sent.borrow().last().cloned()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        if let Some(observer) = &self.observer {
            self.overlay_samples.borrow_mut().push(observer.in_flight.get());
        }
        self.sent.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Transport("no response queued".to_owned())))
    }
}

/// Transport whose requests stay pending until the test releases them, in
/// arrival order.
#[derive(Default)]
pub struct GatedTransport {
    waiting: RefCell<VecDeque<oneshot::Sender<HttpResponse>>>,
}

impl GatedTransport {
    pub fn waiting(&self) -> usize {
        self.waiting.borrow().len()
    }

    /// Settle the oldest pending request. False when none is waiting.
    pub fn release(&self, response: HttpResponse) -> bool {
        let next = self.waiting.borrow_mut().pop_front();
        next.is_some_and(|reply| reply.send(response).is_ok())
    }
}

impl Transport for GatedTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let (reply, response) = oneshot::channel();
        self.waiting.borrow_mut().push_back(reply);
        response
            .await
            .map_err(|_| RequestError::Transport("gate dropped".to_owned()))
    }
}

pub fn json_response(status: u16, body: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("application/json".to_owned()),
        body: serde_json::to_vec(body).unwrap_or_default(),
    }
}

pub fn bytes_response(status: u16, content_type: &str, body: &[u8]) -> HttpResponse {
    HttpResponse { status, content_type: Some(content_type.to_owned()), body: body.to_vec() }
}

/// Confirmation with a fixed answer.
pub struct FakeConfirm {
    answer: bool,
    pub asked: RefCell<Vec<String>>,
}

impl FakeConfirm {
    pub fn answering(answer: bool) -> Self {
        Self { answer, asked: RefCell::new(Vec::new()) }
    }
}

impl Confirm for FakeConfirm {
    async fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_owned());
        self.answer
    }
}

#[derive(Default)]
pub struct FakeNavigator {
    pub assigned: RefCell<Vec<String>>,
    pub reloads: Cell<u32>,
}

impl Navigator for FakeNavigator {
    fn assign(&self, url: &str) {
        self.assigned.borrow_mut().push(url.to_owned());
    }
    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

#[derive(Default)]
pub struct FakeDownloader {
    pub saved: RefCell<Vec<DownloadFile>>,
    pub fail: bool,
}

impl Downloader for FakeDownloader {
    fn save(&self, file: &DownloadFile) -> Result<(), RequestError> {
        if self.fail {
            return Err(RequestError::Transport("blob refused".to_owned()));
        }
        self.saved.borrow_mut().push(file.clone());
        Ok(())
    }
}

/// Chat container store keyed by element id.
#[derive(Default)]
pub struct FakeChatSurface {
    pub containers: RefCell<Vec<(String, Vec<MessageView>, bool)>>,
}

impl FakeChatSurface {
    pub fn with_container(id: &str) -> Self {
        let surface = Self::default();
        surface.containers.borrow_mut().push((id.to_owned(), Vec::new(), false));
        surface
    }

    pub fn contents(&self, id: &str) -> Option<(Vec<MessageView>, bool)> {
        self.containers
            .borrow()
            .iter()
            .find(|(cid, _, _)| cid == id)
            .map(|(_, views, scrolled)| (views.clone(), *scrolled))
    }
}

impl ChatSurface for FakeChatSurface {
    fn render(&self, container_id: &str, views: &[MessageView]) -> bool {
        let mut containers = self.containers.borrow_mut();
        let Some(entry) = containers.iter_mut().find(|(cid, _, _)| cid == container_id) else {
            return false;
        };
        entry.1 = views.to_vec();
        entry.2 = true;
        true
    }
}
