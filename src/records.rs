use crate::errors::ReportError;
use crate::models::AttendanceRecord;
use chrono::Utc;
use futures::future::BoxFuture;
use reqwest::{Client, header};
use serde_json::Value;
use tracing::debug;

pub trait RecordSource: Send + Sync {
    fn fetch_records<'a>(&'a self, dni: &'a str) -> BoxFuture<'a, Result<Vec<AttendanceRecord>, ReportError>>;
}

#[derive(Clone)]
pub struct HttpRecordClient {
    client: Client,
    endpoint: String,
    cache_bust: bool,
}

impl HttpRecordClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            cache_bust: false,
        }
    }

    pub fn with_cache_bust(mut self) -> Self {
        self.cache_bust = true;
        self
    }

    async fn request_records(&self, dni: &str) -> Result<Vec<AttendanceRecord>, ReportError> {
        let mut query = vec![("dni", dni.to_string())];
        let mut request = self.client.get(&self.endpoint);
        if self.cache_bust {
            query.push(("cacheBust", Utc::now().timestamp_millis().to_string()));
            request = request.header(header::CACHE_CONTROL, "no-store");
        }

        let response = request.query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Network {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let records = records_from_body(body);
        debug!(count = records.len(), "record service responded");
        Ok(records)
    }
}

impl RecordSource for HttpRecordClient {
    fn fetch_records<'a>(&'a self, dni: &'a str) -> BoxFuture<'a, Result<Vec<AttendanceRecord>, ReportError>> {
        Box::pin(self.request_records(dni))
    }
}

pub fn records_from_body(body: Value) -> Vec<AttendanceRecord> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .map(AttendanceRecord::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_array_body_has_no_records() {
        assert!(records_from_body(json!({ "error": "quota" })).is_empty());
        assert!(records_from_body(json!("texto")).is_empty());
        assert!(records_from_body(Value::Null).is_empty());
    }

    #[test]
    fn array_items_that_are_not_objects_are_skipped() {
        let records = records_from_body(json!([{ "DNI": "12345678" }, 3, null, "x"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("DNI").as_deref(), Some("12345678"));
    }
}
