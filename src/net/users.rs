//! User administration: role and permission edits, user removal and the
//! audit trail of those changes.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http_client::HttpClient;
use super::profile::ActionResult;
use super::transport::Transport;
use crate::state::confirm::Confirm;
use crate::state::notices::{Notifier, Severity};
use crate::util::browser::Navigator;

pub const PERMISSIONS_LOG_PATH: &str = "/api/permissions/log";
pub const PERMISSIONS_UPDATED_MESSAGE: &str = "Права обновлены";
pub const USER_DELETED_MESSAGE: &str = "Пользователь удален";
pub const DELETE_USER_PROMPT: &str = "Вы уверены, что хотите удалить этого пользователя?";

#[must_use]
pub fn user_path(user_id: &str) -> String {
    format!("/api/users/{user_id}")
}

#[must_use]
pub fn permissions_path(user_id: &str) -> String {
    format!("/api/users/{user_id}/permissions")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PermissionUpdate<'a> {
    pub role: &'a str,
    pub permissions: &'a [String],
}

/// One audited permission change. `changes` is rendered as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionLogEntry {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub admin_id: Value,
    #[serde(default)]
    pub admin_name: Option<String>,
    #[serde(default)]
    pub target_user_id: Value,
    #[serde(default)]
    pub target_name: Option<String>,
    #[serde(default)]
    pub changes: Value,
}

#[derive(Clone, Debug)]
pub struct UsersClient<T, N, C, V> {
    http: HttpClient<T, N>,
    confirm: C,
    navigator: V,
}

impl<T, N, C, V> UsersClient<T, N, C, V>
where
    T: Transport,
    N: Notifier,
    C: Confirm,
    V: Navigator,
{
    pub fn new(http: HttpClient<T, N>, confirm: C, navigator: V) -> Self {
        Self { http, confirm, navigator }
    }

    pub async fn update_permissions(&self, user_id: &str, role: &str, permissions: &[String]) -> Option<ActionResult> {
        let body = PermissionUpdate { role, permissions };
        match self.http.post::<_, ActionResult>(&permissions_path(user_id), &body).await {
            Ok(reply) => {
                let message = reply.message.as_deref().unwrap_or(PERMISSIONS_UPDATED_MESSAGE);
                self.http.notifier().show_toast(message, Severity::Success);
                Some(reply)
            }
            Err(err) => {
                leptos::logging::error!("error updating permissions of user {user_id}: {err}");
                None
            }
        }
    }

    /// Remove a user after confirmation, then reload the page.
    pub async fn delete_user(&self, user_id: &str) -> bool {
        if !self.confirm.confirm(DELETE_USER_PROMPT).await {
            return false;
        }
        match self.http.delete::<ActionResult>(&user_path(user_id)).await {
            Ok(reply) => {
                let message = reply.message.as_deref().unwrap_or(USER_DELETED_MESSAGE);
                self.http.notifier().show_toast(message, Severity::Success);
                self.navigator.reload();
                true
            }
            Err(err) => {
                leptos::logging::error!("error deleting user {user_id}: {err}");
                false
            }
        }
    }

    pub async fn permissions_log(&self) -> Vec<PermissionLogEntry> {
        match self.http.get(PERMISSIONS_LOG_PATH).await {
            Ok(entries) => entries,
            Err(err) => {
                leptos::logging::error!("error loading permissions log: {err}");
                Vec::new()
            }
        }
    }
}
