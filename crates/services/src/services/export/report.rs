//! Standalone HTML documents for the browser's print dialog.
//!
//! The report is meant to be saved as PDF: it prints itself shortly after
//! loading. The print sheet is a lighter layout that closes its window once
//! the dialog is dismissed. Both documents are self-contained (inline CSS,
//! no external resources) and every interpolated value is HTML-escaped.

use std::fmt::Write;

use chrono::{DateTime, TimeZone};
use utils::{date::format_timestamp, text::html_escape};

use super::{ExportError, Exportable, schema::Column};

/// Gives the layout time to settle before the print dialog opens.
pub const PRINT_DELAY_MS: u32 = 500;

const REPORT_STYLE: &str = "\
body { font-family: Arial, Helvetica, sans-serif; margin: 24px; color: #1f2937; }
header { border-bottom: 3px solid #23C1DE; margin-bottom: 20px; padding-bottom: 12px; }
h1 { color: #293296; font-size: 24px; margin: 0 0 6px; }
.generated { color: #6b7280; font-size: 12px; }
.summary { display: flex; gap: 16px; margin: 16px 0; }
.counter { background: #f3f4f6; border-radius: 8px; padding: 10px 16px; min-width: 140px; }
.counter strong { display: block; color: #293296; font-size: 20px; }
.counter span { color: #6b7280; font-size: 12px; }
table { border-collapse: collapse; width: 100%; font-size: 12px; }
th { background: #293296; color: #ffffff; text-align: left; padding: 8px; }
td { border-bottom: 1px solid #e5e7eb; padding: 6px 8px; vertical-align: top; }
tr:nth-child(even) td { background: #f9fafb; }
footer { margin-top: 24px; color: #9ca3af; font-size: 10px; text-align: center; }
@media print { body { margin: 0; } .counter { border: 1px solid #d1d5db; } }
";

const PRINT_STYLE: &str = "\
body { font-family: Arial, Helvetica, sans-serif; margin: 12px; font-size: 10px; }
h1 { font-size: 14px; margin: 0 0 4px; }
.generated { font-size: 9px; margin-bottom: 8px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #999999; padding: 3px 5px; text-align: left; }
th { background: #eeeeee; }
";

pub fn render_report<T: Exportable, Tz: TimeZone>(
    items: &[T],
    generated_at: &DateTime<Tz>,
) -> Result<String, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    if items.is_empty() {
        return Err(ExportError::EmptyInput);
    }
    let tallies = items.iter().fold([0usize; 2], |[a, b], item| {
        let [x, y] = item.tallies();
        [a + x, b + y]
    });
    let counters = [
        ("Total de registros", items.len()),
        (T::TALLY_LABELS[0], tallies[0]),
        (T::TALLY_LABELS[1], tallies[1]),
    ];

    let mut html = String::new();
    open_document(&mut html, T::TITLE, REPORT_STYLE);
    let _ = write!(
        html,
        "<header><h1>{}</h1><div class=\"generated\">Generado el: {}</div></header>\n",
        html_escape(T::TITLE),
        html_escape(&format_timestamp(generated_at)),
    );
    html.push_str("<section class=\"summary\">\n");
    for (label, value) in counters {
        let _ = writeln!(
            html,
            "<div class=\"counter\"><strong>{value}</strong><span>{}</span></div>",
            html_escape(label)
        );
    }
    html.push_str("</section>\n");
    write_table(&mut html, items, &T::report_columns());
    html.push_str("<footer>Yuntas Publicidad - Panel de administración</footer>\n");
    let _ = write!(
        html,
        "<script>\nwindow.onload = function () {{\n  window.focus();\n  setTimeout(function () {{ window.print(); }}, {PRINT_DELAY_MS});\n}};\n</script>\n"
    );
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

pub fn render_print<T: Exportable, Tz: TimeZone>(
    items: &[T],
    generated_at: &DateTime<Tz>,
) -> Result<String, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    if items.is_empty() {
        return Err(ExportError::EmptyInput);
    }
    let mut html = String::new();
    open_document(&mut html, T::TITLE, PRINT_STYLE);
    let _ = writeln!(
        html,
        "<h1>{}</h1><div class=\"generated\">{} - {} registros</div>",
        html_escape(T::TITLE),
        html_escape(&format_timestamp(generated_at)),
        items.len()
    );
    write_table(&mut html, items, &T::print_columns());
    html.push_str(
        "<script>\nwindow.onload = function () { window.focus(); window.print(); };\nwindow.onafterprint = function () { window.close(); };\n</script>\n",
    );
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn open_document(html: &mut String, title: &str, style: &str) {
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n<style>\n{style}</style>\n</head>\n<body>\n",
        html_escape(title)
    );
}

fn write_table<T>(html: &mut String, items: &[T], columns: &[Column<T>]) {
    html.push_str("<table>\n<thead><tr>");
    for column in columns {
        let _ = write!(html, "<th>{}</th>", html_escape(column.header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for item in items {
        html.push_str("<tr>");
        for column in columns {
            let _ = write!(html, "<td>{}</td>", html_escape(&column.render(item)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}
