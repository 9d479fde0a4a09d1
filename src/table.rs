use crate::matcher::{
    CLOCK_IN, CLOCK_OUT, DAILY_ATTENDANCE, DATE, FieldAliases, REMARKS, TOTAL_TIME,
    parse_stored_instant,
};
use crate::models::{AttendanceRecord, AttendanceTable, TABLE_COLUMNS};
use crate::ui::html_escape;

const VALUE_COLUMNS: [FieldAliases; 5] = [DAILY_ATTENDANCE, CLOCK_IN, CLOCK_OUT, TOTAL_TIME, REMARKS];

pub const SKELETON_ROWS: usize = 5;

pub fn build_table(records: &[AttendanceRecord]) -> Option<AttendanceTable> {
    if records.is_empty() {
        return None;
    }

    let rows = records
        .iter()
        .map(|record| {
            let date = DATE
                .first_present(record)
                .map(|raw| format_date(&raw))
                .unwrap_or_default();
            let [attendance, clock_in, clock_out, total, remarks] =
                VALUE_COLUMNS.map(|aliases| aliases.first_non_null(record).unwrap_or_default());
            [date, attendance, clock_in, clock_out, total, remarks]
        })
        .collect();

    Some(AttendanceTable { rows })
}

pub fn format_date(raw: &str) -> String {
    match parse_stored_instant(raw) {
        Some(instant) => instant.format("%d/%m/%y").to_string(),
        None => raw.trim().to_string(),
    }
}

fn header_row() -> String {
    TABLE_COLUMNS
        .iter()
        .map(|column| format!("<th>{column}</th>"))
        .collect()
}

pub fn render_table(table: &AttendanceTable) -> String {
    let body: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(cell)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        "<table class=\"result-table\"><thead><tr>{}</tr></thead><tbody>{body}</tbody></table>",
        header_row()
    )
}

pub fn render_skeleton_table(rows: usize) -> String {
    let body = "<tr class=\"skeleton-row\"><td colspan=\"6\"></td></tr>".repeat(rows);
    format!(
        "<table class=\"result-table visible\"><thead><tr>{}</tr></thead><tbody>{body}</tbody></table>",
        header_row()
    )
}
