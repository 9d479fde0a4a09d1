use crate::calendar::{build_calendars, fill_calendars, render_calendars};
use crate::matcher::{daily_name, match_all_by_identifier, match_by_identifier, monthly_name, monthly_stats};
use crate::models::{MessageKind, PageState, SearchView};
use crate::records::RecordSource;
use crate::report_config::{ConfigSource, read_report_period};
use crate::sanitize::validate_dni;
use crate::table::{build_table, render_table};
use tracing::{debug, error, info};

pub const DAILY_INVALID: &str = "Ingrese un DNI válido (8 dígitos).";
pub const DAILY_EMPTY: &str = "No se encontraron registros.";
pub const DAILY_FAILURE: &str = "Error al cargar datos.";

pub const MONTHLY_INVALID: &str = "DNI inválido (debe tener 8 dígitos).";
pub const MONTHLY_NOT_FOUND: &str = "No se encontró registro para el DNI ingresado en el reporte General.";
pub const MONTHLY_FAILURE: &str = "Error crítico al cargar los datos. Verifique la consola.";
pub const MONTHLY_FOUND: &str = "¡Registro encontrado con éxito!";

pub async fn search_daily(records: &dyn RecordSource, raw_dni: &str) -> SearchView {
    let Ok(dni) = validate_dni(raw_dni) else {
        return SearchView::message_only(PageState::Idle, DAILY_INVALID, MessageKind::Error);
    };

    let fetched = match records.fetch_records(dni).await {
        Ok(fetched) => fetched,
        Err(err) => {
            error!("daily report fetch failed: {err}");
            return SearchView::message_only(PageState::Error, DAILY_FAILURE, MessageKind::Error);
        }
    };

    let rows = match_all_by_identifier(&fetched, dni);
    let Some(table) = build_table(&rows) else {
        info!("daily report: no rows for submitted DNI");
        return SearchView::message_only(PageState::NotFound, DAILY_EMPTY, MessageKind::Error);
    };

    debug!(rows = table.rows.len(), "daily report rendered");
    SearchView {
        name: daily_name(&rows),
        html: render_table(&table),
        ..SearchView::message_only(PageState::Success, "", MessageKind::None)
    }
}

pub async fn search_monthly(
    records: &dyn RecordSource,
    config: &dyn ConfigSource,
    raw_dni: &str,
) -> SearchView {
    let Ok(dni) = validate_dni(raw_dni) else {
        return SearchView::message_only(PageState::Idle, MONTHLY_INVALID, MessageKind::Error);
    };

    let (period, fetched) = tokio::join!(read_report_period(config), records.fetch_records(dni));
    let fetched = match fetched {
        Ok(fetched) => fetched,
        Err(err) => {
            error!("monthly report fetch failed: {err}");
            return SearchView::message_only(PageState::Error, MONTHLY_FAILURE, MessageKind::Error);
        }
    };

    let Some(record) = match_by_identifier(&fetched, dni) else {
        info!("monthly report: no record for submitted DNI");
        return SearchView::message_only(PageState::NotFound, MONTHLY_NOT_FOUND, MessageKind::Error);
    };

    let mut grids = build_calendars(period);
    fill_calendars(&mut grids, record);

    SearchView {
        name: Some(monthly_name(record)),
        stats: Some(monthly_stats(record)),
        html: render_calendars(&grids),
        ..SearchView::message_only(PageState::Success, MONTHLY_FOUND, MessageKind::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, ReportError};
    use crate::models::AttendanceRecord;
    use crate::report_config::{Document, NoConfigStore};
    use futures::future::BoxFuture;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeRecords {
        response: Result<Value, u16>,
        calls: AtomicUsize,
    }

    impl FakeRecords {
        fn ok(body: Value) -> Self {
            Self {
                response: Ok(body),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                response: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl RecordSource for FakeRecords {
        fn fetch_records<'a>(
            &'a self,
            _dni: &'a str,
        ) -> BoxFuture<'a, Result<Vec<AttendanceRecord>, ReportError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match &self.response {
                Ok(body) => Ok(crate::records::records_from_body(body.clone())),
                Err(status) => Err(ReportError::Network { status: *status }),
            };
            Box::pin(async move { result })
        }
    }

    struct BrokenStore;

    impl ConfigSource for BrokenStore {
        fn read_document<'a>(
            &'a self,
            _collection: &'a str,
            _document: &'a str,
        ) -> BoxFuture<'a, Result<Option<Document>, ConfigError>> {
            Box::pin(async { Err::<Option<Document>, _>(ConfigError::Status(503)) })
        }
    }

    #[tokio::test]
    async fn malformed_dni_never_reaches_the_network() {
        let records = FakeRecords::ok(json!([]));
        for bad in ["", "1234", "123456789", "abcdefgh", "1234 5678"] {
            let view = search_daily(&records, bad).await;
            assert_eq!(view.state, PageState::Idle);
            assert_eq!(view.message, DAILY_INVALID);

            let view = search_monthly(&records, &NoConfigStore, bad).await;
            assert_eq!(view.state, PageState::Idle);
            assert_eq!(view.message, MONTHLY_INVALID);
        }
        assert_eq!(records.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn daily_success_renders_sorted_table() {
        let records = FakeRecords::ok(json!([
            { "DNI": "12345678", "NOMBRES": "Rosa Quispe", "Fecha": "2025-05-02T05:00:00.000Z", "Asistencia Diaria": "A" },
            { "DNI": "12345678", "NOMBRES": "Rosa Quispe", "Fecha": "2025-05-01T05:00:00.000Z", "Asistencia Diaria": "T" },
            { "DNI": "87654321", "Fecha": "2025-04-30T05:00:00.000Z" }
        ]));
        let view = search_daily(&records, " 12345678 ").await;
        assert_eq!(view.state, PageState::Success);
        assert_eq!(view.name.as_deref(), Some("Rosa Quispe"));
        let first = view.html.find("01/05/25").expect("first row");
        let second = view.html.find("02/05/25").expect("second row");
        assert!(first < second);
        assert!(!view.html.contains("30/04/25"));
    }

    #[tokio::test]
    async fn daily_failure_and_empty_have_distinct_messages() {
        let view = search_daily(&FakeRecords::failing(500), "12345678").await;
        assert_eq!(view.state, PageState::Error);
        assert_eq!(view.message, DAILY_FAILURE);
        assert!(view.html.is_empty());

        let view = search_daily(&FakeRecords::ok(json!({ "error": "x" })), "12345678").await;
        assert_eq!(view.state, PageState::NotFound);
        assert_eq!(view.message, DAILY_EMPTY);
    }

    #[tokio::test]
    async fn monthly_success_uses_default_period_when_store_fails() {
        let records = FakeRecords::ok(json!([{
            "DNI": 12345678,
            "APELLIDOS Y NOMBRES": "Quispe Rosa",
            "# TOTAL ASISTENCIA VALIDADA": 20,
            "22": "A",
            "5": "na"
        }]));
        let view = search_monthly(&records, &BrokenStore, "12345678").await;
        assert_eq!(view.state, PageState::Success);
        assert_eq!(view.message, MONTHLY_FOUND);
        assert_eq!(view.name.as_deref(), Some("Quispe Rosa"));
        let stats = view.stats.expect("stats");
        assert_eq!(stats.validated, "20");
        assert_eq!(stats.no_show, "0");
        assert!(view.html.contains("<h2>Abril 2025</h2>"));
        assert!(view.html.contains("<h2>Mayo 2025</h2>"));
        assert!(view.html.contains("val-NA"));
        assert!(!view.html.contains("skeleton"));
    }

    #[tokio::test]
    async fn monthly_not_found_and_failure() {
        let view = search_monthly(&FakeRecords::ok(json!([{ "DNI": "11111111" }])), &NoConfigStore, "12345678").await;
        assert_eq!(view.state, PageState::NotFound);
        assert_eq!(view.message, MONTHLY_NOT_FOUND);
        assert!(view.html.is_empty());

        let view = search_monthly(&FakeRecords::failing(502), &NoConfigStore, "12345678").await;
        assert_eq!(view.state, PageState::Error);
        assert_eq!(view.message, MONTHLY_FAILURE);
    }
}
