use std::rc::Rc;

use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::test_support::{FakeTransport, RecordingNotifier};

fn client() -> (ProfileClient<Rc<FakeTransport>, Rc<RecordingNotifier>>, Rc<FakeTransport>, Rc<RecordingNotifier>) {
    let transport = Rc::new(FakeTransport::default());
    let notifier = Rc::new(RecordingNotifier::default());
    (ProfileClient::new(HttpClient::new(transport.clone(), notifier.clone())), transport, notifier)
}

#[test]
fn stats_decode() {
    let (profile, transport, _) = client();
    transport.push_json(200, &json!({ "dse_count": 4, "reports_count": 0, "chats_count": 0, "activity_days": 2 }));
    let stats = block_on(profile.stats()).unwrap();
    assert_eq!(stats.dse_count, 4);
    assert_eq!(stats.activity_days, 2);
}

#[test]
fn stats_failure_is_none() {
    let (profile, transport, _) = client();
    transport.push_json(500, &json!({}));
    assert!(block_on(profile.stats()).is_none());
}

#[test]
fn email_subscription_posts_trimmed_email_and_toasts_server_message() {
    let (profile, transport, notifier) = client();
    transport.push_json(200, &json!({ "success": true, "message": "Настройки подписки обновлены" }));

    let reply = block_on(profile.update_email_subscription(true, "  admin@bolt.local ")).unwrap();

    assert!(reply.success);
    let body: serde_json::Value = serde_json::from_str(transport.last_sent().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "enabled": true, "email": "admin@bolt.local" }));
    assert_eq!(notifier.toasts_with(Severity::Success), vec!["Настройки подписки обновлены".to_owned()]);
}

#[test]
fn email_subscription_rejection_surfaces_server_error() {
    let (profile, transport, notifier) = client();
    transport.push_json(400, &json!({ "error": "Некорректный email адрес" }));
    assert!(block_on(profile.update_email_subscription(true, "nope")).is_none());
    assert_eq!(notifier.toasts_with(Severity::Danger), vec!["Некорректный email адрес".to_owned()]);
    assert!(notifier.toasts_with(Severity::Success).is_empty());
}

#[test]
fn test_email_uses_fallback_message() {
    let (profile, transport, notifier) = client();
    transport.push_json(200, &json!({ "success": true }));
    block_on(profile.send_test_email("a@b.c")).unwrap();
    assert_eq!(transport.last_sent().unwrap().url, TEST_EMAIL_PATH);
    assert_eq!(notifier.toasts_with(Severity::Success), vec!["Тестовое письмо отправлено".to_owned()]);
}

#[test]
fn server_info_decodes_type_field() {
    let (profile, transport, _) = client();
    transport.push_json(
        200,
        &json!({ "url": "http://10.0.0.5:5000", "type": "Local Network", "public_ip": null, "local_ip": "10.0.0.5", "port": 5000, "is_docker": false }),
    );
    let info = block_on(profile.server_info()).unwrap();
    assert_eq!(info.url_type, "Local Network");
    assert_eq!(info.port, 5000);
    assert_eq!(info.local_ip.as_deref(), Some("10.0.0.5"));
}
