//! Page chrome components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted once over the server-rendered page. Each component reads the
//! shared [`crate::app::Services`] from Leptos context and renders one piece
//! of reactive state.

pub mod chat_panel;
pub mod confirm_dialog;
pub mod export_actions;
pub mod loading_overlay;
pub mod toast_stack;
