//! Export of a loaded collection as CSV, Excel-flavoured CSV, a printable
//! report (saved as PDF from the browser's print dialog) or a print sheet.
//!
//! Everything here is synchronous and works on the in-memory slice the
//! caller already holds. Columns come from each entity's [`Exportable`]
//! schema, so the four outputs cannot drift apart.

pub mod delimited;
pub mod entities;
pub mod launcher;
pub mod report;
pub mod schema;

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use strum_macros::{Display, EnumString};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};
use utils::date::iso_date;

pub use delimited::CsvFlavor;
pub use launcher::{DocumentLauncher, SystemBrowser};
pub use schema::{Column, Exportable};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No hay datos para exportar")]
    EmptyInput,
    #[error("No se pudo abrir la ventana del reporte. Verifica que las ventanas emergentes estén permitidas.")]
    PopupBlocked,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
    Print,
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A CSV file was written.
    Saved(PathBuf),
    /// An HTML document was handed to the browser.
    Opened(PathBuf),
}

impl ExportOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Saved(path) | Self::Opened(path) => path,
        }
    }
}

pub struct Exporter<L = SystemBrowser> {
    output_dir: PathBuf,
    document_dir: PathBuf,
    launcher: L,
}

impl Exporter<SystemBrowser> {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_launcher(output_dir, SystemBrowser)
    }
}

impl<L: DocumentLauncher> Exporter<L> {
    pub fn with_launcher(output_dir: impl Into<PathBuf>, launcher: L) -> Self {
        Self {
            output_dir: output_dir.into(),
            document_dir: std::env::temp_dir().join("yuntas"),
            launcher,
        }
    }

    /// Where report and print documents are written before opening them.
    pub fn document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = dir.into();
        self
    }

    pub fn export<T: Exportable>(
        &self,
        items: &[T],
        format: ExportFormat,
    ) -> Result<ExportOutcome, ExportError> {
        self.export_at(items, format, Local::now())
    }

    pub fn export_at<T: Exportable>(
        &self,
        items: &[T],
        format: ExportFormat,
        now: DateTime<Local>,
    ) -> Result<ExportOutcome, ExportError> {
        let result = self.run(items, format, &now);
        match &result {
            Ok(outcome) => info!(
                entity = T::ENTITY,
                %format,
                records = items.len(),
                path = %outcome.path().display(),
                "export finished"
            ),
            Err(e) => warn!(entity = T::ENTITY, %format, error = %e, "export failed"),
        }
        result
    }

    fn run<T: Exportable>(
        &self,
        items: &[T],
        format: ExportFormat,
        now: &DateTime<Local>,
    ) -> Result<ExportOutcome, ExportError> {
        if items.is_empty() {
            return Err(ExportError::EmptyInput);
        }
        match format {
            ExportFormat::Csv | ExportFormat::Excel => {
                let flavor = if format == ExportFormat::Csv {
                    CsvFlavor::Standard
                } else {
                    CsvFlavor::Excel
                };
                let bytes = delimited::render_csv(items, flavor)?;
                let name = flavor.file_name(T::ENTITY, &iso_date(now));
                let path = write_new(&self.output_dir, &name, &bytes)?;
                Ok(ExportOutcome::Saved(path))
            }
            ExportFormat::Pdf | ExportFormat::Print => {
                let (html, stem) = if format == ExportFormat::Pdf {
                    (report::render_report(items, now)?, "reporte")
                } else {
                    (report::render_print(items, now)?, "impresion")
                };
                let name = format!("{}_{}_{}.html", T::ENTITY, stem, now.format("%Y%m%d_%H%M%S"));
                let path = write_new(&self.document_dir, &name, html.as_bytes())?;
                if let Err(e) = self.launcher.launch(&path) {
                    warn!(error = %e, "browser could not be launched");
                    let _ = std::fs::remove_file(&path);
                    return Err(ExportError::PopupBlocked);
                }
                Ok(ExportOutcome::Opened(path))
            }
        }
    }
}

/// Writes the whole buffer to a temp file in `dir`, then links it under
/// `name` without replacing an existing file: `a.csv` is taken, so it lands
/// as `a (1).csv`, then `a (2).csv`. A failure leaves no partial file behind.
fn write_new(dir: &Path, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;

    let mut attempt = 0;
    loop {
        let path = dir.join(numbered_name(name, attempt));
        match file.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                file = e.file;
                attempt += 1;
            }
            Err(e) => return Err(e.error),
        }
    }
}

fn numbered_name(name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem} ({attempt}).{ext}"),
        None => format!("{name} ({attempt})"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::TimeZone;
    use domain::models::cliente::Cliente;

    use super::*;

    #[derive(Default)]
    struct FakeLauncher {
        fail: bool,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl DocumentLauncher for FakeLauncher {
        fn launch(&self, path: &Path) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no browser"));
            }
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn clientes() -> Vec<Cliente> {
        vec![Cliente {
            id: 7,
            name: "Rosa \"La Jefa\" Quispe".to_string(),
            celular: Some("987654321".to_string()),
            email: Some("rosa@yuntas.pe".to_string()),
            producto_id: Some(3),
            created_at: Some("2024-03-05T10:00:00Z".to_string()),
        }]
    }

    fn march_fifth() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_csv_written_with_dated_name() {
        let out = tempfile::tempdir().unwrap();
        let exporter = Exporter::with_launcher(out.path(), FakeLauncher::default());

        let outcome = exporter
            .export_at(&clientes(), ExportFormat::Csv, march_fifth())
            .unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Saved(out.path().join("clientes_export_2024-03-05.csv"))
        );
        let bytes = std::fs::read(outcome.path()).unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

        let excel = exporter
            .export_at(&clientes(), ExportFormat::Excel, march_fifth())
            .unwrap();
        assert_eq!(
            excel.path(),
            out.path().join("clientes_export_2024-03-05 (1).csv")
        );
    }

    #[test]
    fn test_same_day_exports_keep_every_file() {
        let out = tempfile::tempdir().unwrap();
        let exporter = Exporter::with_launcher(out.path(), FakeLauncher::default());

        let first = exporter
            .export_at(&clientes(), ExportFormat::Csv, march_fifth())
            .unwrap();
        std::fs::write(first.path(), b"edited").unwrap();
        let second = exporter
            .export_at(&clientes(), ExportFormat::Csv, march_fifth())
            .unwrap();
        let third = exporter
            .export_at(&clientes(), ExportFormat::Csv, march_fifth())
            .unwrap();

        assert_ne!(first.path(), second.path());
        assert!(third.path().ends_with("clientes_export_2024-03-05 (2).csv"));
        assert_eq!(std::fs::read(first.path()).unwrap(), b"edited");
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("blogs_export_2024-03-05.csv", 0), "blogs_export_2024-03-05.csv");
        assert_eq!(numbered_name("blogs_export_2024-03-05.csv", 3), "blogs_export_2024-03-05 (3).csv");
        assert_eq!(numbered_name("README", 1), "README (1)");
    }

    #[test]
    fn test_empty_input_creates_nothing() {
        let out = tempfile::tempdir().unwrap();
        let exporter = Exporter::with_launcher(out.path(), FakeLauncher::default())
            .document_dir(out.path());

        for format in [ExportFormat::Csv, ExportFormat::Excel, ExportFormat::Pdf, ExportFormat::Print] {
            let result = exporter.export_at::<Cliente>(&[], format, march_fifth());
            assert!(matches!(result, Err(ExportError::EmptyInput)));
        }
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_report_opened_in_browser() {
        let out = tempfile::tempdir().unwrap();
        let exporter = Exporter::with_launcher(out.path(), FakeLauncher::default())
            .document_dir(out.path());

        let outcome = exporter
            .export_at(&clientes(), ExportFormat::Pdf, march_fifth())
            .unwrap();
        let html = std::fs::read_to_string(outcome.path()).unwrap();
        assert!(html.contains("window.print()"));
        assert_eq!(exporter.launcher.opened.borrow().len(), 1);
    }

    #[test]
    fn test_blocked_popup_removes_document() {
        let out = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher {
            fail: true,
            ..Default::default()
        };
        let exporter = Exporter::with_launcher(out.path(), launcher).document_dir(out.path());

        let result = exporter.export_at(&clientes(), ExportFormat::Print, march_fifth());
        assert!(matches!(result, Err(ExportError::PopupBlocked)));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("EXCEL".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!(ExportFormat::Pdf.to_string(), "pdf");
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
