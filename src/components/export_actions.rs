//! Report export buttons for a set of DSE numbers.

#[cfg(test)]
#[path = "export_actions_test.rs"]
mod export_actions_test;

use leptos::prelude::*;

use crate::app::Services;
use crate::net::export::{ExportMode, PdfExportOptions};

/// PDF options for the selected numbers: one report, or a zip of reports
/// when more than one number is selected.
pub fn pdf_options_for(numbers: &[String]) -> PdfExportOptions {
    let mut options = PdfExportOptions::for_numbers(numbers.iter().cloned());
    if numbers.len() > 1 {
        options.mode = ExportMode::Multiple;
    }
    options
}

#[component]
pub fn ExportActions(
    /// DSE numbers included in the PDF report.
    #[prop(into)]
    dse_numbers: Signal<Vec<String>>,
) -> impl IntoView {
    let export = StoredValue::new(expect_context::<Services>().api.export);
    let exporting = RwSignal::new(false);

    let on_excel = move |_| export.with_value(|e| e.to_excel());

    let on_pdf = move |_| {
        if exporting.get_untracked() {
            return;
        }
        let options = pdf_options_for(&dse_numbers.get_untracked());
        exporting.set(true);
        #[cfg(feature = "csr")]
        {
            let trigger = export.get_value();
            leptos::task::spawn_local(async move {
                trigger.to_pdf(&options).await;
                exporting.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = options;
            exporting.set(false);
        }
    };

    view! {
        <div class="btn-group export-actions" role="group">
            <button type="button" class="btn btn-outline-success" on:click=on_excel>
                "Excel"
            </button>
            <button
                type="button"
                class="btn btn-outline-danger"
                disabled=move || exporting.get() || dse_numbers.with(Vec::is_empty)
                on:click=on_pdf
            >
                {move || if exporting.get() { "Генерация..." } else { "PDF" }}
            </button>
        </div>
    }
}
