//! Terminal rendering: notifications and plain-text tables.

use services::services::{
    export::Column,
    notification::{Notification, Notifier, Severity, log_notification},
};
use utils::text::truncate;

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 40;

/// Successes and info go to stdout, warnings and errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
        match notification.severity {
            Severity::Info => println!("{}", notification.message),
            Severity::Success => println!("✓ {}", notification.message),
            Severity::Warning => eprintln!("! {}", notification.message),
            Severity::Error => eprintln!("✗ {}", notification.message),
        }
    }
}

pub fn render_table<T>(columns: &[Column<T>], rows: &[&T]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| truncate(&column.render(row), MAX_COLUMN_WIDTH).into_owned())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<&str> = columns.iter().map(|c| c.header).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.as_ref();
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

pub fn page_footer(page: u32, total_pages: u32, matched: usize) -> String {
    format!("Página {page} de {total_pages} · {matched} registros")
}
