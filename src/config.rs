//! Client configuration.
//!
//! Defaults reproduce the panel's fixed timings. In the browser the API base
//! can be overridden per page with `<meta name="bolt-api-base" content="...">`,
//! which lets the same bundle run behind a path prefix.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Name of the `<meta>` tag carrying an API base override.
pub const API_BASE_META: &str = "bolt-api-base";

/// Runtime settings shared by services and page bootstrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined in front of every `/api/...` path. Empty means same origin.
    pub api_base: String,
    /// How long a toast stays visible before fading.
    pub toast_visible_ms: u32,
    /// Fade-out transition before a toast is detached.
    pub toast_fade_ms: u32,
    /// Per-card delay step for the entrance animation.
    pub card_stagger_ms: u32,
    /// Delay before server-rendered notices are dismissed.
    pub notice_dismiss_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            toast_visible_ms: 5000,
            toast_fade_ms: 150,
            card_stagger_ms: 100,
            notice_dismiss_ms: 5000,
        }
    }
}

impl ClientConfig {
    /// Replace the API base, trimming any trailing slash.
    #[must_use]
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim().trim_end_matches('/').to_owned();
        self
    }

    /// Join an absolute API path onto the configured base.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base, path)
    }

    /// Read configuration from the current document.
    ///
    /// Falls back to defaults outside the browser or when no override is set.
    pub fn from_document() -> Self {
        let config = Self::default();
        #[cfg(feature = "csr")]
        {
            let selector = format!("meta[name=\"{API_BASE_META}\"]");
            let base = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.query_selector(&selector).ok().flatten())
                .and_then(|meta| meta.get_attribute("content"));
            if let Some(base) = base {
                return config.with_api_base(&base);
            }
        }
        config
    }
}

/// Join `base` and `path` with exactly one slash between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_owned();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
