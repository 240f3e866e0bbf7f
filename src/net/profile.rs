//! Profile page endpoints: personal stats, e-mail report subscription and
//! the server address card.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use serde::{Deserialize, Serialize};

use super::error::RequestError;
use super::http_client::HttpClient;
use super::transport::Transport;
use crate::state::notices::{Notifier, Severity};

pub const STATS_PATH: &str = "/api/profile/stats";
pub const EMAIL_SUBSCRIPTION_PATH: &str = "/api/profile/email-subscription";
pub const TEST_EMAIL_PATH: &str = "/api/profile/test-email";
pub const SERVER_INFO_PATH: &str = "/api/server-info";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    #[serde(default)]
    pub dse_count: u64,
    #[serde(default)]
    pub reports_count: u64,
    #[serde(default)]
    pub chats_count: u64,
    #[serde(default)]
    pub activity_days: u64,
}

/// `{ success, message }` reply used by profile and admin endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailSubscription {
    pub enabled: bool,
    pub email: String,
}

#[derive(Serialize)]
struct TestEmailBody<'a> {
    email: &'a str,
}

/// Where the panel is reachable from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub url: String,
    #[serde(rename = "type")]
    pub url_type: String,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub local_ip: Option<String>,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub is_docker: bool,
}

#[derive(Clone, Debug)]
pub struct ProfileClient<T, N> {
    http: HttpClient<T, N>,
}

impl<T: Transport, N: Notifier> ProfileClient<T, N> {
    pub fn new(http: HttpClient<T, N>) -> Self {
        Self { http }
    }

    pub async fn stats(&self) -> Option<ProfileStats> {
        match self.http.get(STATS_PATH).await {
            Ok(stats) => Some(stats),
            Err(err) => {
                leptos::logging::error!("error loading profile stats: {err}");
                None
            }
        }
    }

    pub async fn update_email_subscription(&self, enabled: bool, email: &str) -> Option<ActionResult> {
        let body = EmailSubscription { enabled, email: email.trim().to_owned() };
        let result = self.http.post(EMAIL_SUBSCRIPTION_PATH, &body).await;
        self.acknowledge(result, "Настройки подписки обновлены", "updating e-mail subscription")
    }

    pub async fn send_test_email(&self, email: &str) -> Option<ActionResult> {
        let result = self.http.post(TEST_EMAIL_PATH, &TestEmailBody { email: email.trim() }).await;
        self.acknowledge(result, "Тестовое письмо отправлено", "sending test e-mail")
    }

    pub async fn server_info(&self) -> Option<ServerInfo> {
        match self.http.get(SERVER_INFO_PATH).await {
            Ok(info) => Some(info),
            Err(err) => {
                leptos::logging::error!("error loading server info: {err}");
                None
            }
        }
    }

    fn acknowledge(
        &self,
        result: Result<ActionResult, RequestError>,
        fallback: &str,
        action: &str,
    ) -> Option<ActionResult> {
        match result {
            Ok(reply) => {
                let message = reply.message.as_deref().unwrap_or(fallback);
                self.http.notifier().show_toast(message, Severity::Success);
                Some(reply)
            }
            Err(err) => {
                leptos::logging::error!("error {action}: {err}");
                None
            }
        }
    }
}
