//! Report export triggers.
//!
//! Excel is a plain same-tab navigation; the browser handles the download and
//! this layer never learns whether it worked. PDF goes through `fetch` so the
//! binary body can be saved under a generated name.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::RequestError;
use super::transport::{HttpRequest, Method, Transport};
use crate::config::join_url;
use crate::state::notices::{Notifier, Severity};
use crate::util::browser::{DownloadFile, Downloader, Navigator, now_ms};

pub const EXCEL_EXPORT_PATH: &str = "/api/export/excel";
pub const PDF_EXPORT_PATH: &str = "/api/export/pdf";

pub const EXCEL_STARTED_MESSAGE: &str = "Начинается загрузка Excel файла...";
pub const PDF_CREATED_MESSAGE: &str = "PDF отчет успешно создан";
pub const PDF_FAILED_MESSAGE: &str = "Ошибка генерации PDF";

const PDF_CONTENT_TYPE: &str = "application/pdf";
const ZIP_CONTENT_TYPE: &str = "application/zip";

/// One document, or one document per record packed into a zip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    #[default]
    Single,
    Multiple,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

/// Report parameters accepted by `POST /api/export/pdf`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PdfExportOptions {
    pub dse_numbers: Vec<String>,
    #[serde(default)]
    pub mode: ExportMode,
    #[serde(default = "enabled")]
    pub include_photos: bool,
    #[serde(default = "enabled")]
    pub include_description: bool,
    #[serde(default = "enabled")]
    pub include_user_info: bool,
    #[serde(default = "enabled")]
    pub include_timestamp: bool,
    #[serde(default = "default_page_format")]
    pub page_format: String,
    #[serde(default)]
    pub page_orientation: PageOrientation,
    /// Extra report keys passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn enabled() -> bool {
    true
}

fn default_page_format() -> String {
    "A4".to_owned()
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            dse_numbers: Vec::new(),
            mode: ExportMode::default(),
            include_photos: true,
            include_description: true,
            include_user_info: true,
            include_timestamp: true,
            page_format: default_page_format(),
            page_orientation: PageOrientation::default(),
            extra: Map::new(),
        }
    }
}

impl PdfExportOptions {
    /// Options for the given DSE numbers with every section enabled.
    #[must_use]
    pub fn for_numbers<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { dse_numbers: numbers.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// Download name for a generated report.
///
/// Zip archives (multi-record exports) keep their extension; everything else
/// is saved as PDF.
#[must_use]
pub fn report_filename(timestamp_ms: u64, content_type: &str) -> String {
    let ext = if content_type.trim().to_ascii_lowercase().starts_with(ZIP_CONTENT_TYPE) {
        "zip"
    } else {
        "pdf"
    };
    format!("report_{timestamp_ms}.{ext}")
}

/// Starts report downloads.
#[derive(Clone, Debug)]
pub struct ExportTrigger<T, N, V, D> {
    transport: T,
    notifier: N,
    navigator: V,
    downloader: D,
    base_url: String,
}

impl<T, N, V, D> ExportTrigger<T, N, V, D>
where
    T: Transport,
    N: Notifier,
    V: Navigator,
    D: Downloader,
{
    pub fn new(transport: T, notifier: N, navigator: V, downloader: D) -> Self {
        Self { transport, notifier, navigator, downloader, base_url: String::new() }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Navigate to the spreadsheet endpoint. Fire-and-forget.
    pub fn to_excel(&self) {
        self.navigator.assign(&join_url(&self.base_url, EXCEL_EXPORT_PATH));
        self.notifier.show_toast(EXCEL_STARTED_MESSAGE, Severity::Info);
    }

    /// Generate a report and save it. Returns the saved filename.
    pub async fn to_pdf<P: Serialize + ?Sized>(&self, payload: &P) -> Option<String> {
        let saved = match self.fetch_report(payload).await {
            Ok(file) => self.downloader.save(&file).map(|()| file.filename),
            Err(err) => Err(err),
        };
        match saved {
            Ok(filename) => {
                self.notifier.show_toast(PDF_CREATED_MESSAGE, Severity::Success);
                Some(filename)
            }
            Err(err) => {
                leptos::logging::error!("pdf export failed: {err}");
                self.notifier.show_toast(&err.to_string(), Severity::Danger);
                None
            }
        }
    }

    async fn fetch_report<P: Serialize + ?Sized>(&self, payload: &P) -> Result<DownloadFile, RequestError> {
        let request = HttpRequest::new(Method::Post, join_url(&self.base_url, PDF_EXPORT_PATH)).json_body(payload)?;
        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(RequestError::Status { status: response.status, message: PDF_FAILED_MESSAGE.to_owned() });
        }
        let content_type = response.content_type.unwrap_or_else(|| PDF_CONTENT_TYPE.to_owned());
        Ok(DownloadFile {
            filename: report_filename(now_ms(), &content_type),
            content_type,
            bytes: response.body,
        })
    }
}
