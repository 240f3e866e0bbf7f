use std::rc::Rc;

use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::net::error::RequestError;
use crate::net::transport::Method;
use crate::test_support::{FakeConfirm, FakeNavigator, FakeTransport, RecordingNotifier};

struct Harness {
    client: ResourceClient<Rc<FakeTransport>, Rc<RecordingNotifier>, Rc<FakeConfirm>, Rc<FakeNavigator>>,
    transport: Rc<FakeTransport>,
    notifier: Rc<RecordingNotifier>,
    confirm: Rc<FakeConfirm>,
    navigator: Rc<FakeNavigator>,
}

fn harness(accept: bool) -> Harness {
    let notifier = Rc::new(RecordingNotifier::default());
    let transport = Rc::new(FakeTransport::observing(notifier.clone()));
    let confirm = Rc::new(FakeConfirm::answering(accept));
    let navigator = Rc::new(FakeNavigator::default());
    let http = HttpClient::new(transport.clone(), notifier.clone());
    Harness {
        client: ResourceClient::dse(http, confirm.clone(), navigator.clone()),
        transport,
        notifier,
        confirm,
        navigator,
    }
}

// =============================================================
// Record
// =============================================================

#[test]
fn record_id_accepts_numbers_and_strings() {
    assert_eq!(Record(json!({ "id": 12 })).id().as_deref(), Some("12"));
    assert_eq!(Record(json!({ "id": "A-7" })).id().as_deref(), Some("A-7"));
    assert_eq!(Record(json!({ "dse": "x" })).id(), None);
}

#[test]
fn record_round_trips_unknown_fields() {
    let raw = json!({ "id": 1, "dse": "ДСЕ-1", "photo": null, "nested": { "a": [1, 2] } });
    let record: Record = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    assert_eq!(record.field("dse"), Some(&json!("ДСЕ-1")));
}

// =============================================================
// Loads
// =============================================================

#[test]
fn load_all_returns_records() {
    let h = harness(true);
    h.transport.push_json(200, &json!([{ "id": 1 }, { "id": 2 }]));
    let records = block_on(h.client.load_all());
    assert_eq!(records.len(), 2);
    assert_eq!(h.transport.last_sent().unwrap().url, "/api/dse");
}

#[test]
fn load_all_failure_returns_empty() {
    let h = harness(true);
    h.transport.push(Err(RequestError::Transport("offline".to_owned())));
    let records = block_on(h.client.load_all());
    assert!(records.is_empty());
    assert_eq!(h.notifier.toasts_with(Severity::Danger).len(), 1);
}

#[test]
fn load_by_id_hits_item_path() {
    let h = harness(true);
    h.transport.push_json(200, &json!({ "id": 5 }));
    let record = block_on(h.client.load_by_id("5")).unwrap();
    assert_eq!(record.id().as_deref(), Some("5"));
    assert_eq!(h.transport.last_sent().unwrap().url, "/api/dse/5");
}

#[test]
fn load_by_id_not_found_returns_none() {
    let h = harness(true);
    h.transport.push_json(404, &json!({ "error": "ДСЕ не найдено" }));
    assert!(block_on(h.client.load_by_id("404")).is_none());
    assert_eq!(h.notifier.toasts_with(Severity::Danger), vec!["ДСЕ не найдено".to_owned()]);
}

// =============================================================
// Create / update
// =============================================================

#[test]
fn create_success_returns_record_and_one_success_toast() {
    let h = harness(true);
    h.transport.push_json(201, &json!({ "id": 9, "dse": "A" }));

    let created = block_on(h.client.create(&json!({ "dse": "A" }))).unwrap();

    assert_eq!(created.id().as_deref(), Some("9"));
    assert_eq!(h.notifier.toasts_with(Severity::Success), vec![DSE.created_message.to_owned()]);
    assert_eq!(h.notifier.toasts.borrow().len(), 1);
    assert_eq!(h.transport.last_sent().unwrap().method, Method::Post);
}

#[test]
fn create_failure_returns_none_with_only_failure_toast() {
    let h = harness(true);
    h.transport.push_json(403, &json!({ "error": "Доступ запрещен" }));

    assert!(block_on(h.client.create(&json!({ "dse": "A" }))).is_none());

    assert!(h.notifier.toasts_with(Severity::Success).is_empty());
    assert_eq!(h.notifier.toasts_with(Severity::Danger), vec!["Доступ запрещен".to_owned()]);
}

#[test]
fn update_puts_to_item_and_toasts() {
    let h = harness(true);
    h.transport.push_json(200, &json!({ "id": 3, "dse": "B" }));

    let updated = block_on(h.client.update("3", &json!({ "dse": "B" }))).unwrap();

    assert_eq!(updated.field("dse"), Some(&json!("B")));
    let sent = h.transport.last_sent().unwrap();
    assert_eq!(sent.method, Method::Put);
    assert_eq!(sent.url, "/api/dse/3");
    assert_eq!(h.notifier.toasts_with(Severity::Success), vec![DSE.updated_message.to_owned()]);
}

#[test]
fn update_failure_returns_none() {
    let h = harness(true);
    h.transport.push_json(500, &json!({}));
    assert!(block_on(h.client.update("3", &json!({}))).is_none());
    assert!(h.notifier.toasts_with(Severity::Success).is_empty());
}

// =============================================================
// Delete
// =============================================================

#[test]
fn delete_declined_sends_nothing() {
    let h = harness(false);
    assert!(!block_on(h.client.delete("4")));
    assert_eq!(h.transport.sent_count(), 0);
    assert_eq!(*h.confirm.asked.borrow(), vec![DSE.delete_prompt.to_owned()]);
    assert_eq!(h.navigator.reloads.get(), 0);
}

#[test]
fn delete_accepted_sends_toasts_and_reloads() {
    let h = harness(true);
    h.transport.push_json(200, &json!({ "success": true }));

    assert!(block_on(h.client.delete("4")));

    let sent = h.transport.last_sent().unwrap();
    assert_eq!(sent.method, Method::Delete);
    assert_eq!(sent.url, "/api/dse/4");
    assert_eq!(h.notifier.toasts_with(Severity::Success), vec![DSE.deleted_message.to_owned()]);
    assert_eq!(h.navigator.reloads.get(), 1);
}

#[test]
fn delete_failure_adds_no_toast_of_its_own() {
    let h = harness(true);
    h.transport.push_json(403, &json!({ "error": "Доступ запрещен" }));

    assert!(!block_on(h.client.delete("4")));

    // Only the HTTP layer's danger toast.
    assert_eq!(h.notifier.toasts.borrow().len(), 1);
    assert_eq!(h.navigator.reloads.get(), 0);
}
