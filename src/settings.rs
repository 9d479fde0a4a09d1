use std::{env, time::Duration};

pub const DEFAULT_DAILY_RECORDS_URL: &str = "https://script.google.com/macros/s/AKfycbwTUTnui7bgQ18lwan1YwzdO0Thq99nh_3jkdOgUPTrPARgfyGjKqMNzRQQiQwaotGX/exec";
pub const DEFAULT_MONTHLY_RECORDS_URL: &str = "https://script.google.com/macros/s/AKfycbxvvTR6hP-BY9snJlHqbClqIPq0hYLyIm8KJmncNT0UuEPj3-FZqadFRuKztIU7LP37uw/exec";

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub daily_records_url: String,
    pub monthly_records_url: String,
    /// Firestore REST documents base, e.g.
    /// `https://firestore.googleapis.com/v1/projects/<id>/databases/(default)/documents`.
    pub config_store_url: Option<String>,
    pub upstream_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);
        let upstream_timeout = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(20));

        Self {
            port,
            daily_records_url: env::var("DAILY_RECORDS_URL")
                .unwrap_or_else(|_| DEFAULT_DAILY_RECORDS_URL.to_string()),
            monthly_records_url: env::var("MONTHLY_RECORDS_URL")
                .unwrap_or_else(|_| DEFAULT_MONTHLY_RECORDS_URL.to_string()),
            config_store_url: env::var("CONFIG_STORE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            upstream_timeout,
        }
    }
}
