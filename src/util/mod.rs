pub mod browser;
pub mod format;
pub mod page_bootstrap;
