use crate::errors::ConfigError;
use crate::models::{GateConfig, ReportPeriod, is_truthy};
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const CONFIG_COLLECTION: &str = "configuracion";
pub const PERIOD_DOCUMENT: &str = "reporteAsistencia";
pub const GATE_DOCUMENT: &str = "reporteMensual";

pub type Document = Map<String, Value>;

pub trait ConfigSource: Send + Sync {
    /// `Ok(None)` when the document does not exist.
    fn read_document<'a>(
        &'a self,
        collection: &'a str,
        document: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>, ConfigError>>;
}

#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, collection: &str, document: &str) -> Result<Option<Document>, ConfigError> {
        let url = format!("{}/{collection}/{document}", self.base_url);
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                let raw: FirestoreDocument = serde_json::from_slice(&bytes)?;
                Ok(Some(
                    raw.fields
                        .into_iter()
                        .map(|(name, typed)| (name, decode_typed_value(typed)))
                        .collect(),
                ))
            }
            status => Err(ConfigError::Status(status.as_u16())),
        }
    }
}

impl ConfigSource for FirestoreClient {
    fn read_document<'a>(
        &'a self,
        collection: &'a str,
        document: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>, ConfigError>> {
        Box::pin(self.fetch(collection, document))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfigStore;

impl ConfigSource for NoConfigStore {
    fn read_document<'a>(
        &'a self,
        _collection: &'a str,
        _document: &'a str,
    ) -> BoxFuture<'a, Result<Option<Document>, ConfigError>> {
        Box::pin(async { Ok::<Option<Document>, ConfigError>(None) })
    }
}

fn decode_typed_value(typed: Value) -> Value {
    let Value::Object(mut wrapper) = typed else {
        return typed;
    };
    if let Some(Value::String(text)) = wrapper.remove("integerValue") {
        return text.parse::<i64>().map(Value::from).unwrap_or(Value::String(text));
    }
    for key in ["doubleValue", "stringValue", "booleanValue"] {
        if let Some(value) = wrapper.remove(key) {
            return value;
        }
    }
    if let Some(Value::Object(map)) = wrapper.remove("mapValue") {
        let fields = match map.get("fields") {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };
        return Value::Object(
            fields
                .into_iter()
                .map(|(name, typed)| (name, decode_typed_value(typed)))
                .collect(),
        );
    }
    Value::Null
}

pub async fn read_report_period(source: &dyn ConfigSource) -> ReportPeriod {
    match source.read_document(CONFIG_COLLECTION, PERIOD_DOCUMENT).await {
        Ok(Some(document)) => period_from_document(&document),
        Ok(None) => {
            debug!("period document absent, using default period");
            ReportPeriod::DEFAULT
        }
        Err(err) => {
            warn!("failed to read period config, using default period: {err}");
            ReportPeriod::DEFAULT
        }
    }
}

pub async fn read_gate(source: &dyn ConfigSource) -> GateConfig {
    match source.read_document(CONFIG_COLLECTION, GATE_DOCUMENT).await {
        Ok(Some(document)) => gate_from_document(&document),
        Ok(None) => GateConfig::default(),
        Err(err) => {
            warn!("failed to read gate config, assuming enabled: {err}");
            GateConfig::default()
        }
    }
}

pub fn period_from_document(document: &Document) -> ReportPeriod {
    let default = ReportPeriod::DEFAULT;
    let year = document
        .get("year")
        .and_then(leading_integer)
        .filter(|year| *year != 0)
        .and_then(|year| i32::try_from(year).ok())
        .unwrap_or(default.year());
    let start_month = document
        .get("startMonth")
        .and_then(leading_integer)
        .filter(|month| (0..=11).contains(month))
        .map(|month| month as u32)
        .unwrap_or(default.start_month());

    ReportPeriod::new(year, start_month).unwrap_or(default)
}

// An existing document without the field reads as disabled.
pub fn gate_from_document(document: &Document) -> GateConfig {
    GateConfig {
        habilitado: document.get("habilitado").is_some_and(is_truthy),
    }
}

fn leading_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim_start();
            let (sign, digits) = match text.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, text.strip_prefix('+').unwrap_or(text)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}
