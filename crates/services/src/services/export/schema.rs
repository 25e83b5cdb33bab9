use std::fmt;

use utils::text::truncate;

/// One exported column: a key, the header shown to the user and how the cell
/// is produced from a record.
pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    format: fn(&T) -> String,
    max_chars: Option<usize>,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, header: &'static str, format: fn(&T) -> String) -> Self {
        Self {
            key,
            header,
            format,
            max_chars: None,
        }
    }

    /// Cuts the rendered cell to `max_chars` characters plus `...`.
    pub fn truncated(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    pub fn render(&self, item: &T) -> String {
        let value = (self.format)(item);
        match self.max_chars {
            Some(max) => truncate(&value, max).into_owned(),
            None => value,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

/// Column schemas and report figures for an entity that can be exported.
pub trait Exportable: Sized {
    /// Used in file names, e.g. `blogs_export_2024-03-05.csv`.
    const ENTITY: &'static str;
    /// Heading of the report and print documents.
    const TITLE: &'static str;
    /// Labels of the two per-record tallies summed in the report header.
    const TALLY_LABELS: [&'static str; 2];

    fn csv_columns() -> Vec<Column<Self>>;

    fn excel_columns() -> Vec<Column<Self>>;

    fn report_columns() -> Vec<Column<Self>>;

    fn print_columns() -> Vec<Column<Self>>;

    fn tallies(&self) -> [usize; 2];
}

/// `""` for missing text.
pub fn text_or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}
