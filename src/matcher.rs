use crate::models::{AttendanceRecord, MonthlyStats, is_truthy, value_text};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

pub const IDENTIFIER_FIELD: &str = "DNI";
pub const ABSENT_DAY: &str = "F";

#[derive(Debug, Clone, Copy)]
pub struct FieldAliases(pub &'static [&'static str]);

impl FieldAliases {
    pub fn first_present(&self, record: &AttendanceRecord) -> Option<String> {
        self.0
            .iter()
            .filter_map(|key| record.get(key))
            .find(|value| is_truthy(value))
            .and_then(value_text)
    }

    pub fn first_non_null(&self, record: &AttendanceRecord) -> Option<String> {
        self.0.iter().find_map(|key| record.text(key))
    }
}

pub const MONTHLY_NAME: FieldAliases = FieldAliases(&["APELLIDOS Y NOMBRES", "NOMBRES", "Empleado"]);
pub const DAILY_NAME: FieldAliases = FieldAliases(&["NOMBRES", "APELLIDOS Y NOMBRES"]);
pub const DATE: FieldAliases = FieldAliases(&["Fecha", "fecha"]);
pub const DAILY_ATTENDANCE: FieldAliases = FieldAliases(&["Asistencia Diaria"]);
pub const CLOCK_IN: FieldAliases = FieldAliases(&["Marcación Ingreso"]);
pub const CLOCK_OUT: FieldAliases = FieldAliases(&["Marcación Salida"]);
pub const TOTAL_TIME: FieldAliases = FieldAliases(&["Tiempo Total"]);
pub const REMARKS: FieldAliases = FieldAliases(&["Observacion"]);
pub const VALIDATED_TOTAL: FieldAliases = FieldAliases(&["# TOTAL ASISTENCIA VALIDADA"]);
pub const NO_SHOW_TOTAL: FieldAliases = FieldAliases(&["# NO MARCÓ"]);
pub const SHOULD_SHOW_TOTAL: FieldAliases = FieldAliases(&["# DEBIO MARCAR"]);

pub const MISSING_NAME: &str = "Nombre no encontrado";

pub fn has_identifier(record: &AttendanceRecord, dni: &str) -> bool {
    record
        .get(IDENTIFIER_FIELD)
        .filter(|value| is_truthy(value))
        .and_then(value_text)
        .is_some_and(|id| id.trim() == dni)
}

pub fn match_by_identifier<'a>(
    records: &'a [AttendanceRecord],
    dni: &str,
) -> Option<&'a AttendanceRecord> {
    records.iter().find(|record| has_identifier(record, dni))
}

pub fn match_all_by_identifier(records: &[AttendanceRecord], dni: &str) -> Vec<AttendanceRecord> {
    let mut matched: Vec<(Option<NaiveDateTime>, AttendanceRecord)> = records
        .iter()
        .filter(|record| has_identifier(record, dni))
        .map(|record| (record_instant(record), record.clone()))
        .collect();

    matched.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    matched.into_iter().map(|(_, record)| record).collect()
}

fn record_instant(record: &AttendanceRecord) -> Option<NaiveDateTime> {
    DATE.first_present(record).and_then(|raw| parse_stored_instant(&raw))
}

pub fn parse_stored_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(instant);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Display value for one calendar day. `key` may be padded (`"05"`) or not.
pub fn day_value(record: &AttendanceRecord, key: &str) -> String {
    let candidates = match key.trim().parse::<u32>() {
        Ok(day) => vec![format!("{day:02}"), day.to_string()],
        Err(_) => vec![key.to_string()],
    };

    let raw = candidates
        .iter()
        .filter_map(|candidate| record.get(candidate))
        .find(|value| is_truthy(value))
        .and_then(value_text)
        .unwrap_or_else(|| ABSENT_DAY.to_string());

    normalize_mark(&raw)
}

pub fn normalize_mark(raw: &str) -> String {
    let value = raw.trim().to_uppercase();
    match value.as_str() {
        "NA" => "N/A".to_string(),
        "MI" => "M/I".to_string(),
        _ => value,
    }
}

pub fn style_class(display_value: &str) -> String {
    display_value
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

pub fn monthly_name(record: &AttendanceRecord) -> String {
    MONTHLY_NAME
        .first_present(record)
        .unwrap_or_else(|| MISSING_NAME.to_string())
}

pub fn daily_name(records: &[AttendanceRecord]) -> Option<String> {
    records.first().and_then(|record| DAILY_NAME.first_present(record))
}

pub fn monthly_stats(record: &AttendanceRecord) -> MonthlyStats {
    let stat = |aliases: FieldAliases| aliases.first_present(record).unwrap_or_else(|| "0".to_string());
    MonthlyStats {
        validated: stat(VALIDATED_TOTAL),
        no_show: stat(NO_SHOW_TOTAL),
        should_show: stat(SHOULD_SHOW_TOTAL),
    }
}
