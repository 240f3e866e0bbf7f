//! Browser seams: navigation, blob downloads, native confirm, DOM chat
//! container.
//!
//! Each browser type compiles everywhere; outside the `csr` build it is a
//! safe no-op (or returns an error) so server-side and test builds stay
//! deterministic.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use std::rc::Rc;

use crate::net::error::RequestError;
use crate::state::chat::{ChatSurface, MessageView};
use crate::state::confirm::Confirm;

/// Page-level navigation.
pub trait Navigator {
    /// Same-tab navigation to `url`.
    fn assign(&self, url: &str);
    /// Full page reload.
    fn reload(&self);
}

impl<V: Navigator + ?Sized> Navigator for Rc<V> {
    fn assign(&self, url: &str) {
        (**self).assign(url);
    }
    fn reload(&self) {
        (**self).reload();
    }
}

/// A binary payload to hand to the user as a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Saves binary payloads as user downloads.
pub trait Downloader {
    /// # Errors
    ///
    /// Returns an error if the platform refuses to create the download.
    fn save(&self, file: &DownloadFile) -> Result<(), RequestError>;
}

impl<D: Downloader + ?Sized> Downloader for Rc<D> {
    fn save(&self, file: &DownloadFile) -> Result<(), RequestError> {
        (**self).save(file)
    }
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// `window.location` navigation.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn assign(&self, url: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(url) {
                    log::warn!("navigation to {url} failed: {e:?}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = url;
        }
    }

    fn reload(&self) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().reload() {
                    log::warn!("page reload failed: {e:?}");
                }
            }
        }
    }
}

/// Object-URL + temporary anchor download.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDownloader;

impl Downloader for BrowserDownloader {
    fn save(&self, file: &DownloadFile) -> Result<(), RequestError> {
        #[cfg(feature = "csr")]
        {
            use wasm_bindgen::JsCast;
            use wasm_bindgen::JsValue;

            let js_err = |e: JsValue| RequestError::Transport(format!("{e:?}"));
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| RequestError::Transport("no document".to_owned()))?;
            let body = document
                .body()
                .ok_or_else(|| RequestError::Transport("no document body".to_owned()))?;

            let parts = js_sys::Array::new();
            parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
            let options = web_sys::BlobPropertyBag::new();
            options.set_type(&file.content_type);
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&JsValue::from(parts), &options)
                .map_err(js_err)?;
            let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

            let anchor: web_sys::HtmlAnchorElement = document
                .create_element("a")
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| RequestError::Transport("anchor element expected".to_owned()))?;
            anchor.set_href(&url);
            anchor.set_download(&file.filename);
            body.append_child(&anchor).map_err(js_err)?;
            anchor.click();
            anchor.remove();
            web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(RequestError::Transport(format!(
                "cannot save {} outside the browser",
                file.filename
            )))
        }
    }
}

/// Native `window.confirm`, wrapped as a deferred answer.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    async fn confirm(&self, message: &str) -> bool {
        #[cfg(feature = "csr")]
        {
            web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = message;
            false
        }
    }
}

/// Renders chat views into an element looked up by id.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomChatSurface;

impl ChatSurface for DomChatSurface {
    fn render(&self, container_id: &str, views: &[MessageView]) -> bool {
        #[cfg(feature = "csr")]
        {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return false;
            };
            let Some(container) = document.get_element_by_id(container_id) else {
                return false;
            };
            container.set_inner_html("");
            for view in views {
                if let Err(e) = append_message(&document, &container, view) {
                    log::warn!("chat render failed: {e:?}");
                }
            }
            container.set_scroll_top(container.scroll_height());
            true
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (container_id, views);
            false
        }
    }
}

#[cfg(feature = "csr")]
fn append_message(
    document: &web_sys::Document,
    container: &web_sys::Element,
    view: &MessageView,
) -> Result<(), wasm_bindgen::JsValue> {
    let row = document.create_element("div")?;
    row.set_class_name(&view.class());
    let text = document.create_element("div")?;
    text.set_class_name("message-text");
    text.set_text_content(Some(&view.text));
    let time = document.create_element("div")?;
    time.set_class_name("time");
    time.set_text_content(Some(&view.time));
    row.append_child(&text)?;
    row.append_child(&time)?;
    container.append_child(&row)?;
    Ok(())
}
