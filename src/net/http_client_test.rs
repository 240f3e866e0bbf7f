use std::rc::Rc;

use futures::executor::block_on;
use serde_json::{Value, json};

use super::*;
use crate::net::transport::{HttpResponse, JSON_CONTENT_TYPE};
use crate::test_support::{FakeTransport, RecordingNotifier};

fn client() -> (HttpClient<Rc<FakeTransport>, Rc<RecordingNotifier>>, Rc<FakeTransport>, Rc<RecordingNotifier>) {
    let notifier = Rc::new(RecordingNotifier::default());
    let transport = Rc::new(FakeTransport::observing(notifier.clone()));
    (HttpClient::new(transport.clone(), notifier.clone()), transport, notifier)
}

#[test]
fn get_decodes_json_and_releases_overlay() {
    let (http, transport, notifier) = client();
    transport.push_json(200, &json!([{ "id": 1 }]));

    let value: Value = block_on(http.get("/api/dse")).unwrap();

    assert_eq!(value, json!([{ "id": 1 }]));
    assert_eq!(*transport.overlay_samples.borrow(), vec![1]);
    assert_eq!(notifier.in_flight.get(), 0);
    assert!(notifier.toasts.borrow().is_empty());
}

#[test]
fn every_request_carries_json_content_type() {
    let (http, transport, _) = client();
    transport.push_json(200, &json!({}));
    let _: Value = block_on(http.get("/api/chat/messages")).unwrap();
    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.url, "/api/chat/messages");
    assert_eq!(sent.header_value("Content-Type"), Some(JSON_CONTENT_TYPE));
}

#[test]
fn post_and_put_serialize_body() {
    let (http, transport, _) = client();
    transport.push_json(201, &json!({ "id": 7 }));
    transport.push_json(200, &json!({ "id": 7 }));

    let _: Value = block_on(http.post("/api/dse", &json!({ "dse": "A" }))).unwrap();
    let _: Value = block_on(http.put("/api/dse/7", &json!({ "dse": "B" }))).unwrap();

    let sent = transport.sent.borrow();
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"dse":"A"}"#));
    assert_eq!(sent[1].method, Method::Put);
    assert_eq!(sent[1].url, "/api/dse/7");
    assert_eq!(sent[1].body.as_deref(), Some(r#"{"dse":"B"}"#));
}

#[test]
fn delete_sends_no_body() {
    let (http, transport, _) = client();
    transport.push_json(200, &json!({ "success": true }));
    let _: Value = block_on(http.delete("/api/dse/3")).unwrap();
    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.method, Method::Delete);
    assert!(sent.body.is_none());
}

#[test]
fn non_2xx_surfaces_server_message_once() {
    let (http, transport, notifier) = client();
    transport.push_json(403, &json!({ "error": "Доступ запрещен" }));

    let err = block_on(http.get::<Value>("/api/dse")).unwrap_err();

    assert_eq!(err, RequestError::Status { status: 403, message: "Доступ запрещен".to_owned() });
    assert_eq!(notifier.toasts_with(Severity::Danger), vec!["Доступ запрещен".to_owned()]);
    assert_eq!(notifier.toasts.borrow().len(), 1);
    assert_eq!(notifier.in_flight.get(), 0);
}

#[test]
fn transport_failure_still_releases_overlay() {
    let (http, transport, notifier) = client();
    transport.push(Err(RequestError::Transport("Failed to fetch".to_owned())));

    let err = block_on(http.get::<Value>("/api/dse")).unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch");
    assert_eq!(notifier.shows.get(), 1);
    assert_eq!(notifier.hides.get(), 1);
    assert_eq!(notifier.toasts_with(Severity::Danger), vec!["Failed to fetch".to_owned()]);
}

#[test]
fn undecodable_body_is_a_failure() {
    let (http, transport, notifier) = client();
    transport.push(Ok(HttpResponse { status: 200, content_type: None, body: b"not json".to_vec() }));

    let err = block_on(http.get::<Value>("/api/dse")).unwrap_err();

    assert!(matches!(err, RequestError::Body(_)));
    assert_eq!(notifier.toasts.borrow().len(), 1);
    assert_eq!(notifier.in_flight.get(), 0);
}

#[test]
fn empty_success_body_decodes_as_null() {
    let (http, transport, _) = client();
    transport.push(Ok(HttpResponse { status: 204, content_type: None, body: Vec::new() }));
    let value: Value = block_on(http.delete("/api/dse/1")).unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn base_url_prefixes_paths() {
    let (http, transport, _) = client();
    let http = http.with_base_url("/panel");
    transport.push_json(200, &json!([]));
    let _: Value = block_on(http.get("/api/dse")).unwrap();
    assert_eq!(transport.last_sent().unwrap().url, "/panel/api/dse");
}

#[test]
fn sequential_requests_never_stack_overlay() {
    let (http, transport, notifier) = client();
    transport.push_json(200, &json!(1));
    transport.push_json(500, &json!({}));
    transport.push_json(200, &json!(3));

    let _: Result<Value, _> = block_on(http.get("/a"));
    let _: Result<Value, _> = block_on(http.get("/b"));
    let _: Result<Value, _> = block_on(http.get("/c"));

    assert_eq!(*transport.overlay_samples.borrow(), vec![1, 1, 1]);
    assert_eq!(notifier.in_flight.get(), 0);
    assert_eq!(notifier.toasts_with(Severity::Danger), vec!["Ошибка запроса".to_owned()]);
}

#[test]
fn overlapping_requests_hold_overlay_until_last_settles() {
    use std::cell::RefCell;

    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    use crate::test_support::{GatedTransport, json_response};

    let notifier = Rc::new(RecordingNotifier::default());
    let transport = Rc::new(GatedTransport::default());
    let http = HttpClient::new(transport.clone(), notifier.clone());
    let settled = Rc::new(RefCell::new(Vec::new()));

    let mut pool = LocalPool::new();
    for path in ["/api/dse", "/api/chat/messages"] {
        let http = http.clone();
        let settled = settled.clone();
        pool.spawner()
            .spawn_local(async move {
                let result: Result<Value, RequestError> = http.get(path).await;
                settled.borrow_mut().push((path, result.is_ok()));
            })
            .unwrap();
    }

    pool.run_until_stalled();
    assert_eq!(transport.waiting(), 2);
    assert_eq!(notifier.in_flight.get(), 2);

    assert!(transport.release(json_response(200, &json!([]))));
    pool.run_until_stalled();
    assert_eq!(settled.borrow().len(), 1);
    assert_eq!(notifier.in_flight.get(), 1, "overlay must stay while a request is pending");

    assert!(transport.release(json_response(500, &json!({ "error": "boom" }))));
    pool.run_until_stalled();
    assert_eq!(*settled.borrow(), vec![("/api/dse", true), ("/api/chat/messages", false)]);
    assert_eq!(notifier.in_flight.get(), 0);
    assert_eq!(notifier.shows.get(), 2);
    assert_eq!(notifier.hides.get(), 2);
}
