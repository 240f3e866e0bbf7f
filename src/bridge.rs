//! Script-facing surface for server-rendered pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page templates call the API from inline scripts (`bolt.dseCreate(...)`,
//! `bolt.chatRefresh("chat-box")`, ...). [`PageApi`] is that contract in
//! plain Rust: JSON in, JSON out, every service operation reachable. The
//! `csr` build wraps it in the `#[wasm_bindgen]` type `BoltPage`, installed
//! on `window.bolt`, whose async methods return promises.
//!
//! ERROR HANDLING
//! ==============
//! Service failures keep their sentinel results (`null`, `[]`, `false`).
//! Only malformed script input is an error; it rejects the promise.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use serde::Serialize;
use serde_json::Value;

use crate::net::chat::{ChatClient, ChatMessage};
use crate::net::error::RequestError;
use crate::net::export::ExportTrigger;
use crate::net::profile::ProfileClient;
use crate::net::resource::ResourceClient;
use crate::net::transport::Transport;
use crate::net::users::UsersClient;
use crate::state::chat::{ChatSurface, display_messages};
use crate::state::confirm::Confirm;
use crate::state::notices::{Notifier, Severity};
use crate::util::browser::{Downloader, Navigator};

/// Name of the `window` property holding the script API.
pub const WINDOW_GLOBAL: &str = "bolt";

/// Every page operation behind one value.
#[derive(Clone, Debug)]
pub struct PageApi<T, N, C, V, D, S> {
    pub notifier: N,
    pub dse: ResourceClient<T, N, C, V>,
    pub export: ExportTrigger<T, N, V, D>,
    pub chat: ChatClient<T, N>,
    pub profile: ProfileClient<T, N>,
    pub users: UsersClient<T, N, C, V>,
    pub chat_surface: S,
}

fn to_json<R: Serialize>(value: &R) -> Value {
    match serde_json::to_value(value) {
        Ok(json) => json,
        Err(err) => {
            leptos::logging::error!("cannot encode page reply: {err}");
            Value::Null
        }
    }
}

impl<T, N, C, V, D, S> PageApi<T, N, C, V, D, S>
where
    T: Transport,
    N: Notifier,
    C: Confirm,
    V: Navigator,
    D: Downloader,
    S: ChatSurface,
{
    /// Toast from page scripts. Unknown severities fall back to info.
    pub fn notify(&self, message: &str, severity: Option<&str>) {
        let severity = severity.and_then(Severity::parse).unwrap_or_default();
        self.notifier.show_toast(message, severity);
    }

    pub async fn load_records(&self) -> Value {
        to_json(&self.dse.load_all().await)
    }

    pub async fn load_record(&self, id: &str) -> Value {
        to_json(&self.dse.load_by_id(id).await)
    }

    pub async fn create_record(&self, data: &Value) -> Value {
        to_json(&self.dse.create(data).await)
    }

    pub async fn update_record(&self, id: &str, data: &Value) -> Value {
        to_json(&self.dse.update(id, data).await)
    }

    pub async fn delete_record(&self, id: &str) -> bool {
        self.dse.delete(id).await
    }

    pub fn export_excel(&self) {
        self.export.to_excel();
    }

    /// Saved filename, or `null`.
    pub async fn export_pdf(&self, options: &Value) -> Value {
        to_json(&self.export.to_pdf(options).await)
    }

    pub async fn load_messages(&self) -> Value {
        to_json(&self.chat.load_messages().await)
    }

    pub async fn send_message(&self, text: &str, target_user_id: Option<&str>) -> Value {
        to_json(&self.chat.send_message(text, target_user_id).await)
    }

    /// Render a message array into `container_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Body`] when `messages` is not a message array.
    pub fn display_messages(&self, messages: &Value, container_id: &str) -> Result<usize, RequestError> {
        let messages: Vec<ChatMessage> = serde_json::from_value(messages.clone())?;
        display_messages(&self.chat_surface, &messages, container_id);
        Ok(messages.len())
    }

    /// Load history and render it into `container_id`. Returns the count shown.
    pub async fn refresh_chat(&self, container_id: &str) -> usize {
        let messages = self.chat.load_messages().await;
        display_messages(&self.chat_surface, &messages, container_id);
        messages.len()
    }

    pub async fn profile_stats(&self) -> Value {
        to_json(&self.profile.stats().await)
    }

    pub async fn update_email_subscription(&self, enabled: bool, email: &str) -> Value {
        to_json(&self.profile.update_email_subscription(enabled, email).await)
    }

    pub async fn send_test_email(&self, email: &str) -> Value {
        to_json(&self.profile.send_test_email(email).await)
    }

    pub async fn server_info(&self) -> Value {
        to_json(&self.profile.server_info().await)
    }

    /// # Errors
    ///
    /// Returns [`RequestError::Body`] when `permissions` is not a string array.
    pub async fn update_permissions(
        &self,
        user_id: &str,
        role: &str,
        permissions: &Value,
    ) -> Result<Value, RequestError> {
        let permissions: Vec<String> = match permissions {
            Value::Null => Vec::new(),
            other => serde_json::from_value(other.clone())?,
        };
        Ok(to_json(&self.users.update_permissions(user_id, role, &permissions).await))
    }

    pub async fn delete_user(&self, user_id: &str) -> bool {
        self.users.delete_user(user_id).await
    }

    pub async fn permissions_log(&self) -> Value {
        to_json(&self.users.permissions_log().await)
    }
}

#[cfg(feature = "csr")]
pub use page::{BoltPage, expose};

#[cfg(feature = "csr")]
mod page {
    use js_sys::Promise;
    use serde_json::Value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::future_to_promise;

    use super::WINDOW_GLOBAL;
    use crate::app::{PageServices, Services};
    use crate::util::format::format_date;

    fn to_js(value: &Value) -> Result<JsValue, JsValue> {
        let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        js_sys::JSON::parse(&text)
    }

    fn from_js(value: &JsValue) -> Result<Value, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Value::Null);
        }
        let text: String = js_sys::JSON::stringify(value)?.into();
        serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `window.bolt`: promise-returning wrappers over [`super::PageApi`].
    #[wasm_bindgen]
    pub struct BoltPage {
        api: PageServices,
    }

    impl BoltPage {
        fn run<F, Fut>(&self, call: F) -> Promise
        where
            F: FnOnce(PageServices) -> Fut,
            Fut: std::future::Future<Output = Result<Value, JsValue>> + 'static,
        {
            let fut = call(self.api.clone());
            future_to_promise(async move { to_js(&fut.await?) })
        }
    }

    #[wasm_bindgen]
    impl BoltPage {
        #[wasm_bindgen(js_name = showToast)]
        pub fn show_toast(&self, message: &str, severity: Option<String>) {
            self.api.notify(message, severity.as_deref());
        }

        #[wasm_bindgen(js_name = formatDate)]
        pub fn format_date(&self, value: Option<String>) -> String {
            format_date(value.as_deref())
        }

        #[wasm_bindgen(js_name = dseLoadAll)]
        pub fn dse_load_all(&self) -> Promise {
            self.run(|api| async move { Ok(api.load_records().await) })
        }

        #[wasm_bindgen(js_name = dseLoad)]
        pub fn dse_load(&self, id: String) -> Promise {
            self.run(|api| async move { Ok(api.load_record(&id).await) })
        }

        #[wasm_bindgen(js_name = dseCreate)]
        pub fn dse_create(&self, data: JsValue) -> Promise {
            let data = from_js(&data);
            self.run(|api| async move { Ok(api.create_record(&data?).await) })
        }

        #[wasm_bindgen(js_name = dseUpdate)]
        pub fn dse_update(&self, id: String, data: JsValue) -> Promise {
            let data = from_js(&data);
            self.run(|api| async move { Ok(api.update_record(&id, &data?).await) })
        }

        #[wasm_bindgen(js_name = dseDelete)]
        pub fn dse_delete(&self, id: String) -> Promise {
            self.run(|api| async move { Ok(Value::Bool(api.delete_record(&id).await)) })
        }

        #[wasm_bindgen(js_name = exportExcel)]
        pub fn export_excel(&self) {
            self.api.export_excel();
        }

        #[wasm_bindgen(js_name = exportPdf)]
        pub fn export_pdf(&self, options: JsValue) -> Promise {
            let options = from_js(&options);
            self.run(|api| async move { Ok(api.export_pdf(&options?).await) })
        }

        #[wasm_bindgen(js_name = chatLoad)]
        pub fn chat_load(&self) -> Promise {
            self.run(|api| async move { Ok(api.load_messages().await) })
        }

        #[wasm_bindgen(js_name = chatSend)]
        pub fn chat_send(&self, text: String, target_user_id: Option<String>) -> Promise {
            self.run(|api| async move { Ok(api.send_message(&text, target_user_id.as_deref()).await) })
        }

        #[wasm_bindgen(js_name = chatDisplay)]
        pub fn chat_display(&self, messages: JsValue, container_id: &str) -> Result<usize, JsValue> {
            let messages = from_js(&messages)?;
            self.api
                .display_messages(&messages, container_id)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        }

        #[wasm_bindgen(js_name = chatRefresh)]
        pub fn chat_refresh(&self, container_id: String) -> Promise {
            self.run(|api| async move { Ok(Value::from(api.refresh_chat(&container_id).await)) })
        }

        #[wasm_bindgen(js_name = profileStats)]
        pub fn profile_stats(&self) -> Promise {
            self.run(|api| async move { Ok(api.profile_stats().await) })
        }

        #[wasm_bindgen(js_name = updateEmailSubscription)]
        pub fn update_email_subscription(&self, enabled: bool, email: String) -> Promise {
            self.run(|api| async move { Ok(api.update_email_subscription(enabled, &email).await) })
        }

        #[wasm_bindgen(js_name = sendTestEmail)]
        pub fn send_test_email(&self, email: String) -> Promise {
            self.run(|api| async move { Ok(api.send_test_email(&email).await) })
        }

        #[wasm_bindgen(js_name = serverInfo)]
        pub fn server_info(&self) -> Promise {
            self.run(|api| async move { Ok(api.server_info().await) })
        }

        #[wasm_bindgen(js_name = updatePermissions)]
        pub fn update_permissions(&self, user_id: String, role: String, permissions: JsValue) -> Promise {
            let permissions = from_js(&permissions);
            self.run(|api| async move {
                api.update_permissions(&user_id, &role, &permissions?)
                    .await
                    .map_err(|e| JsValue::from_str(&e.to_string()))
            })
        }

        #[wasm_bindgen(js_name = deleteUser)]
        pub fn delete_user(&self, user_id: String) -> Promise {
            self.run(|api| async move { Ok(Value::Bool(api.delete_user(&user_id).await)) })
        }

        #[wasm_bindgen(js_name = permissionsLog)]
        pub fn permissions_log(&self) -> Promise {
            self.run(|api| async move { Ok(api.permissions_log().await) })
        }
    }

    /// Install `window.bolt` for page scripts.
    pub fn expose(services: &Services) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let page = JsValue::from(BoltPage { api: services.api.clone() });
        if let Err(e) = js_sys::Reflect::set(&window, &JsValue::from_str(WINDOW_GLOBAL), &page) {
            log::warn!("cannot expose window.{WINDOW_GLOBAL}: {e:?}");
        }
    }
}
