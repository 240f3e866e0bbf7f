//! Service wiring and the root component.
//!
//! ARCHITECTURE
//! ============
//! [`Services`] is built once from [`ClientConfig`] and provided through
//! Leptos context. Components read it with `expect_context`; page bootstrap
//! receives it explicitly, and page scripts reach it through `window.bolt`. Optional widgets are mounted into placeholder
//! elements the server page may render.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;

use crate::bridge::PageApi;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::loading_overlay::LoadingOverlay;
use crate::components::toast_stack::ToastStack;
use crate::config::ClientConfig;
use crate::net::chat::ChatClient;
use crate::net::export::ExportTrigger;
use crate::net::http_client::HttpClient;
use crate::net::profile::ProfileClient;
use crate::net::resource::ResourceClient;
use crate::net::transport::GlooTransport;
use crate::net::users::UsersClient;
use crate::state::confirm::{ConfirmState, ModalConfirm};
use crate::state::notices::{NoticeBoard, NoticeState, ToastTimings};
use crate::util::browser::{BrowserDownloader, BrowserNavigator, DomChatSurface};

/// Placeholder the chat panel mounts into.
pub const CHAT_ROOT_ID: &str = "chat-root";
/// Optional direct-message recipient on the chat placeholder.
pub const CHAT_TARGET_ATTR: &str = "data-target-user";
/// Placeholder the export buttons mount into.
pub const EXPORT_ROOT_ID: &str = "export-root";
/// Comma-separated DSE numbers on the export placeholder.
pub const DSE_NUMBERS_ATTR: &str = "data-dse-numbers";

pub type Http = HttpClient<GlooTransport, NoticeBoard>;
pub type DseClient = ResourceClient<GlooTransport, NoticeBoard, ModalConfirm, BrowserNavigator>;
pub type Exporter = ExportTrigger<GlooTransport, NoticeBoard, BrowserNavigator, BrowserDownloader>;
pub type PageServices =
    PageApi<GlooTransport, NoticeBoard, ModalConfirm, BrowserNavigator, BrowserDownloader, DomChatSurface>;

/// Every client the page talks to, sharing one notice board and one modal.
#[derive(Clone, Debug)]
pub struct Services {
    pub config: ClientConfig,
    pub notices: NoticeBoard,
    pub confirm: ModalConfirm,
    pub api: PageServices,
}

impl Services {
    pub fn new(config: ClientConfig) -> Self {
        let notices = NoticeBoard::new(RwSignal::new(NoticeState::default()), ToastTimings::from(&config));
        let confirm = ModalConfirm::new(RwSignal::new(ConfirmState::default()));
        let http: Http = HttpClient::new(GlooTransport, notices).with_base_url(config.api_base.clone());
        let api = PageApi {
            notifier: notices,
            dse: ResourceClient::dse(http.clone(), confirm, BrowserNavigator),
            export: ExportTrigger::new(GlooTransport, notices, BrowserNavigator, BrowserDownloader)
                .with_base_url(config.api_base.clone()),
            chat: ChatClient::new(http.clone()),
            profile: ProfileClient::new(http.clone()),
            users: UsersClient::new(http, confirm, BrowserNavigator),
            chat_surface: DomChatSurface,
        };
        Self { config, notices, confirm, api }
    }
}

/// Split a `data-dse-numbers` value, dropping blanks.
pub fn parse_dse_numbers(attr: &str) -> Vec<String> {
    attr.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Page chrome: overlay, toasts and the confirmation modal. Runs page
/// bootstrap once after mount.
#[component]
pub fn App(services: Services) -> impl IntoView {
    provide_context(services.clone());

    #[cfg(feature = "csr")]
    {
        let services = services.clone();
        Effect::new(move || {
            crate::util::page_bootstrap::install(&services);
            mount_widgets(&services);
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = services;
    }

    view! {
        <LoadingOverlay/>
        <ToastStack/>
        <ConfirmDialog/>
    }
}

#[cfg(feature = "csr")]
fn mount_widgets(services: &Services) {
    use wasm_bindgen::JsCast;

    use crate::components::chat_panel::ChatPanel;
    use crate::components::export_actions::ExportActions;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let placeholder = |id: &str| {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    };

    if let Some(root) = placeholder(CHAT_ROOT_ID) {
        let target = root.get_attribute(CHAT_TARGET_ATTR).filter(|t| !t.trim().is_empty());
        let services = services.clone();
        log::debug!("mounting chat panel");
        leptos::mount::mount_to(root, move || {
            provide_context(services);
            view! { <ChatPanel target_user_id=target/> }
        })
        .forget();
    }

    if let Some(root) = placeholder(EXPORT_ROOT_ID) {
        let numbers = parse_dse_numbers(&root.get_attribute(DSE_NUMBERS_ATTR).unwrap_or_default());
        let services = services.clone();
        log::debug!("mounting export actions for {} records", numbers.len());
        leptos::mount::mount_to(root, move || {
            provide_context(services);
            view! { <ExportActions dse_numbers=numbers/> }
        })
        .forget();
    }
}
