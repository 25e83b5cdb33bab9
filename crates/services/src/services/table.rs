//! The table view behind each admin listing: search over the loaded rows,
//! one page of the result, and export/print of what was loaded.
//!
//! Errors surface only through the [`Notifier`].

use std::{path::Path, sync::Arc};

use super::{
    export::{DocumentLauncher, ExportError, ExportFormat, ExportOutcome, Exportable, Exporter},
    notification::{Notification, Notifier},
    pagination::{ClientPager, Pagination},
    search::{SearchState, Searchable},
};

pub struct TableActions<L: DocumentLauncher> {
    exporter: Exporter<L>,
    notifier: Arc<dyn Notifier>,
}

impl<L: DocumentLauncher> TableActions<L> {
    pub fn new(exporter: Exporter<L>, notifier: Arc<dyn Notifier>) -> Self {
        Self { exporter, notifier }
    }

    pub fn export<T: Exportable>(&self, items: &[T], format: ExportFormat) -> Option<ExportOutcome> {
        match self.exporter.export(items, format) {
            Ok(outcome) => {
                self.notifier.notify(Notification::success(success_message(format, outcome.path())));
                Some(outcome)
            }
            Err(e) => {
                let notification = match &e {
                    ExportError::EmptyInput | ExportError::PopupBlocked => {
                        Notification::error(e.to_string())
                    }
                    other => Notification::error(format!("Error al exportar: {other}")),
                };
                self.notifier.notify(notification);
                None
            }
        }
    }
}

fn success_message(format: ExportFormat, path: &Path) -> String {
    match format {
        ExportFormat::Csv | ExportFormat::Excel => {
            format!("Archivo exportado: {}", path.display())
        }
        ExportFormat::Pdf => {
            "Reporte abierto en el navegador. Elige \"Guardar como PDF\" en el diálogo de impresión."
                .to_string()
        }
        ExportFormat::Print => "Documento enviado a impresión.".to_string(),
    }
}

/// Rows visible after searching, sliced to one page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a, T> {
    pub rows: Vec<&'a T>,
    pub matched: usize,
    pub page: u32,
    pub total_pages: u32,
}

/// Filters `items` by the search query, then shows `page` of the matches.
/// An out-of-range page falls back to the first one.
pub fn view<'a, T: Searchable>(
    items: &'a [T],
    search: &SearchState,
    page: u32,
    page_size: usize,
) -> TableView<'a, T> {
    let matched = search.apply(items);
    let mut pager = ClientPager::new(matched.len(), page_size);
    pager.go_to(page);
    let rows = pager.slice(&matched).to_vec();
    TableView {
        rows,
        matched: matched.len(),
        page: pager.current_page(),
        total_pages: pager.total_pages(),
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use domain::models::cliente::Cliente;

    use super::*;
    use crate::services::notification::{RecordingNotifier, Severity};

    struct NoBrowser;

    impl DocumentLauncher for NoBrowser {
        fn launch(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::other("no display"))
        }
    }

    fn cliente(id: i64, name: &str) -> Cliente {
        Cliente {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn actions(dir: PathBuf) -> (TableActions<NoBrowser>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let exporter = Exporter::with_launcher(&dir, NoBrowser).document_dir(&dir);
        (TableActions::new(exporter, notifier.clone()), notifier)
    }

    #[test]
    fn test_export_failures_are_notified() {
        let dir = tempfile::tempdir().unwrap();
        let (actions, notifier) = actions(dir.path().to_path_buf());

        assert!(actions.export::<Cliente>(&[], ExportFormat::Csv).is_none());
        let empty = notifier.last().unwrap();
        assert_eq!(empty.severity, Severity::Error);
        assert_eq!(empty.message, "No hay datos para exportar");

        assert!(actions.export(&[cliente(1, "Ana")], ExportFormat::Pdf).is_none());
        assert!(notifier.last().unwrap().message.contains("ventanas emergentes"));
    }

    #[test]
    fn test_csv_export_notifies_success() {
        let dir = tempfile::tempdir().unwrap();
        let (actions, notifier) = actions(dir.path().to_path_buf());

        let outcome = actions.export(&[cliente(1, "Ana")], ExportFormat::Csv).unwrap();
        assert!(outcome.path().exists());
        assert_eq!(notifier.last().unwrap().severity, Severity::Success);
    }

    #[test]
    fn test_view_searches_then_pages() {
        let items: Vec<Cliente> = (1..=13)
            .map(|i| cliente(i, if i % 2 == 0 { "Panel LED" } else { "Vinil" }))
            .collect();
        let mut search = SearchState::new();

        let all = view(&items, &search, 3, 5);
        assert_eq!((all.matched, all.total_pages, all.rows.len()), (13, 3, 3));

        search.set_query("led", &items);
        let filtered = view(&items, &search, 3, 5);
        assert_eq!(filtered.matched, 6);
        assert_eq!(filtered.total_pages, 2);
        assert_eq!(filtered.page, 1);
        assert!(filtered.rows.iter().all(|c| c.name == "Panel LED"));
    }
}
