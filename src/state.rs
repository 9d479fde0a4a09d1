use crate::records::{HttpRecordClient, RecordSource};
use crate::report_config::{ConfigSource, FirestoreClient, NoConfigStore};
use crate::settings::Settings;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub daily_records: Arc<dyn RecordSource>,
    pub monthly_records: Arc<dyn RecordSource>,
    pub config: Arc<dyn ConfigSource>,
}

impl AppState {
    pub fn new(
        daily_records: Arc<dyn RecordSource>,
        monthly_records: Arc<dyn RecordSource>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            daily_records,
            monthly_records,
            config,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.upstream_timeout).build()?;

        let config: Arc<dyn ConfigSource> = match &settings.config_store_url {
            Some(url) => Arc::new(FirestoreClient::new(client.clone(), url.clone())),
            None => {
                info!("no CONFIG_STORE_URL set, report settings use built-in defaults");
                Arc::new(NoConfigStore)
            }
        };

        Ok(Self::new(
            Arc::new(HttpRecordClient::new(client.clone(), settings.daily_records_url.clone()).with_cache_bust()),
            Arc::new(HttpRecordClient::new(client, settings.monthly_records_url.clone())),
            config,
        ))
    }
}
