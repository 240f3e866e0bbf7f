//! Generic CRUD facade over one REST collection.
//!
//! SYSTEM CONTEXT
//! ==============
//! Instantiated for the DSE business record. Operations never propagate
//! errors: failures are logged and turned into `None`, an empty list or
//! `false`, the HTTP layer having already shown the danger toast.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http_client::HttpClient;
use super::transport::Transport;
use crate::state::confirm::Confirm;
use crate::state::notices::{Notifier, Severity};
use crate::util::browser::Navigator;

/// Paths and user-facing texts for one resource type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceKind {
    /// Collection path, e.g. `/api/dse`.
    pub collection: &'static str,
    /// Name used in log lines.
    pub label: &'static str,
    pub created_message: &'static str,
    pub updated_message: &'static str,
    pub deleted_message: &'static str,
    pub delete_prompt: &'static str,
}

impl ResourceKind {
    #[must_use]
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.collection)
    }
}

/// DSE (assembly unit) records.
pub const DSE: ResourceKind = ResourceKind {
    collection: "/api/dse",
    label: "DSE",
    created_message: "ДСЕ успешно создано",
    updated_message: "ДСЕ успешно обновлено",
    deleted_message: "ДСЕ успешно удалено",
    delete_prompt: "Вы уверены, что хотите удалить это ДСЕ?",
};

/// An opaque JSON record; fields pass through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Value);

impl Record {
    /// The record's `id`, rendered as a path segment.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// CRUD client with toasts, confirmation-gated delete and reload on delete.
#[derive(Clone, Debug)]
pub struct ResourceClient<T, N, C, V> {
    http: HttpClient<T, N>,
    confirm: C,
    navigator: V,
    kind: ResourceKind,
}

impl<T, N, C, V> ResourceClient<T, N, C, V>
where
    T: Transport,
    N: Notifier,
    C: Confirm,
    V: Navigator,
{
    pub fn new(http: HttpClient<T, N>, confirm: C, navigator: V, kind: ResourceKind) -> Self {
        Self { http, confirm, navigator, kind }
    }

    /// Client for DSE records.
    pub fn dse(http: HttpClient<T, N>, confirm: C, navigator: V) -> Self {
        Self::new(http, confirm, navigator, DSE)
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// All records. Empty on failure, which callers cannot tell apart from
    /// an empty collection.
    pub async fn load_all(&self) -> Vec<Record> {
        match self.http.get(self.kind.collection).await {
            Ok(records) => records,
            Err(err) => {
                leptos::logging::error!("error loading {}: {err}", self.kind.label);
                Vec::new()
            }
        }
    }

    pub async fn load_by_id(&self, id: &str) -> Option<Record> {
        match self.http.get(&self.kind.item_path(id)).await {
            Ok(record) => Some(record),
            Err(err) => {
                leptos::logging::error!("error loading {} {id}: {err}", self.kind.label);
                None
            }
        }
    }

    pub async fn create<B: Serialize + ?Sized>(&self, data: &B) -> Option<Record> {
        match self.http.post(self.kind.collection, data).await {
            Ok(record) => {
                self.http.notifier().show_toast(self.kind.created_message, Severity::Success);
                Some(record)
            }
            Err(err) => {
                leptos::logging::error!("error creating {}: {err}", self.kind.label);
                None
            }
        }
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, data: &B) -> Option<Record> {
        match self.http.put(&self.kind.item_path(id), data).await {
            Ok(record) => {
                self.http.notifier().show_toast(self.kind.updated_message, Severity::Success);
                Some(record)
            }
            Err(err) => {
                leptos::logging::error!("error updating {} {id}: {err}", self.kind.label);
                None
            }
        }
    }

    /// Delete after confirmation, then reload the page.
    ///
    /// Declining sends nothing. A failed delete is only logged here.
    pub async fn delete(&self, id: &str) -> bool {
        if !self.confirm.confirm(self.kind.delete_prompt).await {
            return false;
        }
        match self.http.delete::<Value>(&self.kind.item_path(id)).await {
            Ok(_) => {
                self.http.notifier().show_toast(self.kind.deleted_message, Severity::Success);
                self.navigator.reload();
                true
            }
            Err(err) => {
                leptos::logging::error!("error deleting {} {id}: {err}", self.kind.label);
                false
            }
        }
    }
}
