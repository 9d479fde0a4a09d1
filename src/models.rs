use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceRecord(Map<String, Value>);

impl AttendanceRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(value_text)
    }
}

impl From<Value> for AttendanceRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(
            number
                .as_i64()
                .map(|n| n.to_string())
                .or_else(|| number.as_u64().map(|n| n.to_string()))
                .or_else(|| number.as_f64().map(|n| n.to_string()))
                .unwrap_or_else(|| number.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    year: i32,
    start_month: u32,
}

impl ReportPeriod {
    pub const DEFAULT: ReportPeriod = ReportPeriod {
        year: 2025,
        start_month: 3,
    };

    pub fn new(year: i32, start_month: u32) -> Option<Self> {
        if start_month > 11 {
            return None;
        }
        // the second grid may roll into the next year
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 12, 31)?;
        NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some(Self { year, start_month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }
}

impl Default for ReportPeriod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateConfig {
    pub habilitado: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { habilitado: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Skeleton,
    Filled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub day: u32,
    pub key: String,
    pub display_value: String,
    pub style_class: String,
    pub state: CellState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub title: String,
    pub year: i32,
    pub month_index: u32,
    pub leading_blanks: u32,
    pub cells: Vec<CalendarCell>,
}

pub const TABLE_COLUMNS: [&str; 6] = ["Fecha", "Asist. Diaria", "Ingreso", "Salida", "Total", "Obs"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceTable {
    pub rows: Vec<[String; 6]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub validated: String,
    pub no_show: String,
    pub should_show: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    Idle,
    Success,
    NotFound,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    None,
    Success,
    Error,
}

impl MessageKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageKind::None => "",
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchView {
    pub state: PageState,
    pub message: String,
    pub message_kind: MessageKind,
    pub name: Option<String>,
    pub stats: Option<MonthlyStats>,
    pub html: String,
}

impl SearchView {
    pub fn idle() -> Self {
        Self::message_only(PageState::Idle, "", MessageKind::None)
    }

    pub fn message_only(state: PageState, message: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            state,
            message: message.into(),
            message_kind: kind,
            name: None,
            stats: None,
            html: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub dni: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_renders_numbers_like_the_sheet() {
        let record = AttendanceRecord::from(json!({
            "DNI": 12345678,
            "Tiempo Total": 8.5,
            "Horas": 8.0,
            "Observacion": null
        }));
        assert_eq!(record.text("DNI").as_deref(), Some("12345678"));
        assert_eq!(record.text("Tiempo Total").as_deref(), Some("8.5"));
        assert_eq!(record.text("Horas").as_deref(), Some("8"));
        assert_eq!(record.text("Observacion"), None);
        assert_eq!(record.text("Missing"), None);
    }

    #[test]
    fn period_rejects_out_of_range_month() {
        assert!(ReportPeriod::new(2025, 12).is_none());
        assert!(ReportPeriod::new(2025, 11).is_some());
        assert!(ReportPeriod::new(i32::MAX, 0).is_none());
    }
}
