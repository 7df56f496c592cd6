//! Async HTTP client for the salvage analysis service.
//!
//! The service owns reprocessing yields, market prices and build
//! profitability; this crate only speaks its JSON contract.

use std::time::Duration;

use reqwest::Url;
use salvage_core::core_api::{
    AnalysisRequest, AnalysisResponse, MarketPrice, ServiceErrorBody, UpdateMarketPricesRequest,
    UpdateMarketPricesResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const BASE_URL_ENV: &str = "SALVAGE_API_URL";
pub const TIMEOUT_ENV: &str = "SALVAGE_API_TIMEOUT_SECS";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze salvage";

const ANALYZE_ROUTE: &str = "api/salvage/analyze";
const MARKET_UPDATE_ROUTE: &str = "api/market/update";
const MARKET_PRICES_ROUTE: &str = "api/market/prices";
const HEALTH_ROUTE: &str = "health";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid service url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to analysis service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("analysis service returned HTTP {status}{}", payload_suffix(.message))]
    Service { status: u16, message: Option<String> },
    #[error("failed to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn payload_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Text to show a user: the service's own message when it sent one,
    /// otherwise a description of what went wrong on the wire.
    pub fn user_message(&self) -> String {
        let text = match self {
            Self::Service {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Service {
                status,
                message: None,
            } => format!("Request failed with status code {status}"),
            other => other.to_string(),
        };
        if text.trim().is_empty() {
            return GENERIC_FAILURE_MESSAGE.to_string();
        }
        text
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `SALVAGE_API_URL` and `SALVAGE_API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid service timeout override"),
            }
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ClientError> {
        info!(
            items = request.salvage_items.len(),
            efficiency = request.reprocessing_efficiency.value(),
            "requesting salvage analysis"
        );
        let response: AnalysisResponse = self.post_json(ANALYZE_ROUTE, "analysis", request).await?;
        info!(
            materials = response.materials.len(),
            buildable = response.buildable_items.len(),
            unknown = response.unknown_items.len(),
            "analysis complete"
        );
        Ok(response)
    }

    /// Asks the service to refresh cached market prices. An empty slice
    /// refreshes every known type.
    pub async fn update_market_prices(
        &self,
        type_ids: &[i32],
    ) -> Result<UpdateMarketPricesResponse, ClientError> {
        let request = UpdateMarketPricesRequest {
            type_ids: type_ids.to_vec(),
        };
        self.post_json(MARKET_UPDATE_ROUTE, "market update", &request)
            .await
    }

    pub async fn market_prices(&self, type_ids: &[i32]) -> Result<Vec<MarketPrice>, ClientError> {
        let request = UpdateMarketPricesRequest {
            type_ids: type_ids.to_vec(),
        };
        self.post_json(MARKET_PRICES_ROUTE, "market prices", &request)
            .await
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let url = self.endpoint(HEALTH_ROUTE)?;
        debug!(%url, "checking service health");
        let response = self.http.get(url).send().await?;
        let body = success_body(response).await?;
        Ok(body.trim().to_string())
    }

    async fn post_json<B, T>(&self, route: &str, what: &'static str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        debug!(%url, "posting to analysis service");
        let response = self.http.post(url).json(body).send().await?;
        let body = success_body(response).await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { what, source })
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(route)
            .map_err(|err| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim()).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    // Relative joins replace the last path segment unless it ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn success_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let message = error_message_from_body(&body);
    warn!(
        status = status.as_u16(),
        message = message.as_deref().unwrap_or(""),
        "analysis service rejected request"
    );
    Err(ClientError::Service {
        status: status.as_u16(),
        message,
    })
}

/// Pulls `message` (or failing that `error`) out of a JSON error body.
pub fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("http://localhost:3000/planner").expect("url should parse");
        assert_eq!(url.as_str(), "http://localhost:3000/planner/");
        assert_eq!(
            url.join(ANALYZE_ROUTE).expect("join").as_str(),
            "http://localhost:3000/planner/api/salvage/analyze"
        );
    }

    #[test]
    fn base_url_rejects_garbage_and_other_schemes() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn config_from_lookup_reads_overrides() {
        let config = ClientConfig::from_lookup(|key| match key {
            BASE_URL_ENV => Some("https://salvage.example".to_string()),
            TIMEOUT_ENV => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://salvage.example");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_from_lookup_ignores_bad_values() {
        let config = ClientConfig::from_lookup(|key| match key {
            BASE_URL_ENV => Some("   ".to_string()),
            TIMEOUT_ENV => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn user_message_prefers_payload() {
        let err = ClientError::Service {
            status: 404,
            message: Some("Salvage item 'Foo' not found in database".to_string()),
        };
        assert_eq!(err.user_message(), "Salvage item 'Foo' not found in database");
        assert_eq!(err.status(), Some(404));

        let err = ClientError::Service {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), "Request failed with status code 502");
        assert_eq!(err.to_string(), "analysis service returned HTTP 502");
    }

    #[test]
    fn error_body_parsing() {
        assert_eq!(
            error_message_from_body(r#"{"error":"Database error"}"#).as_deref(),
            Some("Database error")
        );
        assert_eq!(error_message_from_body("<html>bad gateway</html>"), None);
        assert_eq!(error_message_from_body("{}"), None);
    }
}
