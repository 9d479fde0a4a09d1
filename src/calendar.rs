use crate::matcher::{day_value, style_class};
use crate::models::{AttendanceRecord, CalendarCell, CellState, MonthGrid, ReportPeriod};
use crate::ui::html_escape;
use chrono::{Datelike, NaiveDate};

pub const PERIOD_START_DAY: u32 = 22;
pub const PERIOD_END_DAY: u32 = 21;

pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const WEEKDAY_HEADERS: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

pub fn build_calendars(period: ReportPeriod) -> [MonthGrid; 2] {
    let start_month = period.start_month();
    let year = period.year();
    let (next_month, next_year) = if start_month == 11 {
        (0, year + 1)
    } else {
        (start_month + 1, year)
    };

    let last_day = last_day_of_month(year, start_month);
    [
        month_grid(year, start_month, PERIOD_START_DAY, last_day),
        month_grid(next_year, next_month, 1, PERIOD_END_DAY),
    ]
}

pub fn last_day_of_month(year: i32, month_index: u32) -> u32 {
    let (next_year, next_month) = if month_index == 11 {
        (year + 1, 1)
    } else {
        (year, month_index + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn month_grid(year: i32, month_index: u32, first_day: u32, last_day: u32) -> MonthGrid {
    let leading_blanks = NaiveDate::from_ymd_opt(year, month_index + 1, first_day)
        .map(|date| date.weekday().num_days_from_monday())
        .unwrap_or(0);

    let cells = (first_day..=last_day)
        .map(|day| CalendarCell {
            day,
            key: format!("{day:02}"),
            display_value: String::new(),
            style_class: String::new(),
            state: CellState::Skeleton,
        })
        .collect();

    MonthGrid {
        title: format!("{} {}", MONTH_NAMES[month_index as usize], year),
        year,
        month_index,
        leading_blanks,
        cells,
    }
}

pub fn fill_calendars(grids: &mut [MonthGrid], record: &AttendanceRecord) {
    for cell in grids.iter_mut().flat_map(|grid| grid.cells.iter_mut()) {
        let value = day_value(record, &cell.key);
        cell.style_class = format!("val-{}", style_class(&value));
        cell.display_value = value;
        cell.state = CellState::Filled;
    }
}

pub fn render_calendars(grids: &[MonthGrid]) -> String {
    let headers: String = WEEKDAY_HEADERS
        .iter()
        .map(|name| format!("<div>{name}</div>"))
        .collect();

    let mut html = String::new();
    let mut reveal_index = 0usize;
    for grid in grids {
        html.push_str(&format!(
            "<div class=\"month-calendar\"><h2>{}</h2><div class=\"weekday-header\">{headers}</div><div class=\"days-grid\">",
            html_escape(&grid.title)
        ));
        html.push_str(&"<div class=\"empty\"></div>".repeat(grid.leading_blanks as usize));
        for cell in &grid.cells {
            let classes = match cell.state {
                CellState::Skeleton => "day skeleton".to_string(),
                CellState::Filled => format!("day has-value {}", cell.style_class),
            };
            html.push_str(&format!(
                "<div class=\"{classes}\" data-day=\"{}\" style=\"--reveal:{reveal_index}\"><span class=\"date\">{}</span><span class=\"value\">{}</span></div>",
                cell.key,
                cell.day,
                html_escape(&cell.display_value)
            ));
            reveal_index += 1;
        }
        html.push_str("</div></div>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn period(year: i32, month: u32) -> ReportPeriod {
        ReportPeriod::new(year, month).unwrap()
    }

    #[test]
    fn april_2025_period() {
        let [first, second] = build_calendars(period(2025, 3));
        assert_eq!(first.title, "Abril 2025");
        assert_eq!(first.cells.len(), 9);
        assert_eq!(first.cells.first().map(|c| c.day), Some(22));
        assert_eq!(first.cells.last().map(|c| c.day), Some(30));
        // 2025-04-22 is a Tuesday
        assert_eq!(first.leading_blanks, 1);

        assert_eq!(second.title, "Mayo 2025");
        assert_eq!(second.cells.len(), 21);
        assert_eq!(second.cells[4].key, "05");
        // 2025-05-01 is a Thursday
        assert_eq!(second.leading_blanks, 3);
        assert!(second.cells.iter().all(|c| c.state == CellState::Skeleton));
    }

    #[test]
    fn sunday_start_gets_six_blanks() {
        // 2025-06-01 is a Sunday
        let [_, second] = build_calendars(period(2025, 4));
        assert_eq!(second.title, "Junio 2025");
        assert_eq!(second.leading_blanks, 6);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let [first, second] = build_calendars(period(2025, 11));
        assert_eq!(first.title, "Diciembre 2025");
        assert_eq!(second.title, "Enero 2026");
        assert_eq!(second.year, 2026);
    }

    #[test]
    fn cell_count_tracks_month_length() {
        for year in [2023, 2024, 2025, 2100] {
            for month in 0..12 {
                let grids = build_calendars(period(year, month));
                let total: usize = grids.iter().map(|g| g.cells.len()).sum();
                let expected = (last_day_of_month(year, month) - 22 + 1) + 21;
                assert_eq!(total, expected as usize, "{year}-{month}");
            }
        }
        assert_eq!(last_day_of_month(2024, 1), 29);
        assert_eq!(last_day_of_month(2100, 1), 28);
    }

    #[test]
    fn fill_applies_marks_and_classes() {
        let record = AttendanceRecord::from(json!({ "22": "a", "5": "na", "06": "mi" }));
        let mut grids = build_calendars(period(2025, 3));
        fill_calendars(&mut grids, &record);

        let first = &grids[0].cells[0];
        assert_eq!(first.display_value, "A");
        assert_eq!(first.style_class, "val-A");
        assert_eq!(first.state, CellState::Filled);

        let fifth = &grids[1].cells[4];
        assert_eq!(fifth.display_value, "N/A");
        assert_eq!(fifth.style_class, "val-NA");
        assert_eq!(grids[1].cells[5].display_value, "M/I");
        assert_eq!(grids[1].cells[6].display_value, "F");
    }

    #[test]
    fn rendered_grid_has_blanks_and_keys() {
        let html = render_calendars(&build_calendars(period(2025, 3)));
        assert!(html.contains("<h2>Abril 2025</h2>"));
        assert!(html.contains("data-day=\"05\""));
        assert_eq!(html.matches("class=\"empty\"").count(), 1 + 3);
        assert_eq!(html.matches("day skeleton").count(), 30);
    }
}
