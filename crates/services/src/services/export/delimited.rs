use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{ExportError, Exportable, schema::Column};

/// Lets spreadsheet applications detect the encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFlavor {
    /// Comma separated, full column set.
    Standard,
    /// Semicolon separated, for spreadsheet locales using `,` as decimal mark.
    Excel,
}

impl CsvFlavor {
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Standard => b',',
            Self::Excel => b';',
        }
    }

    /// Both flavours share `<entity>_export_<date>.csv`; a collision is
    /// resolved when the file is written.
    pub fn file_name(self, entity: &str, date: &str) -> String {
        format!("{entity}_export_{date}.csv")
    }

    fn columns<T: Exportable>(self) -> Vec<Column<T>> {
        match self {
            Self::Standard => T::csv_columns(),
            Self::Excel => T::excel_columns(),
        }
    }
}

/// Renders the header plus one line per record. Cells never span lines, so
/// N records always give N + 1 lines.
pub fn render_csv<T: Exportable>(items: &[T], flavor: CsvFlavor) -> Result<Vec<u8>, ExportError> {
    if items.is_empty() {
        return Err(ExportError::EmptyInput);
    }
    let columns = flavor.columns::<T>();
    let mut writer = WriterBuilder::new()
        .delimiter(flavor.delimiter())
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(columns.iter().map(|column| column.header))?;
    for item in items {
        writer.write_record(columns.iter().map(|column| single_line(column.render(item))))?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn single_line(cell: String) -> String {
    if cell.contains(['\n', '\r']) {
        cell.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        cell
    }
}
