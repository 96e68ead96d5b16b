//! Data endpoint client.
//!
//! One URL serves both directions: `GET ?callback=<name>[&sheet=..]` returns
//! the records (plain JSON or a JSONP script), `POST` with a form body applies
//! a [`Mutation`]. Any 2xx status is success.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::http::Client;
use crate::mutation::Mutation;
use crate::view::ViewConfig;
use crate::{BusinessConfig, Record};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API returned status: {0}")]
    Status(u16),
    #[error("failed to parse records: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Record source and mutation sink used by the table engine and submitters.
#[async_trait]
pub trait RequestsApi: Send + Sync {
    /// Fetch the full record set for `view`. Status filtering happens client side.
    async fn fetch_records(&self, view: &ViewConfig) -> ApiResult<Vec<Record>>;

    /// POST one mutation.
    async fn submit(&self, mutation: &Mutation) -> ApiResult<()>;
}

/// [`RequestsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRequestsApi {
    config: BusinessConfig,
}

impl HttpRequestsApi {
    pub fn new(config: BusinessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }
}

#[async_trait]
impl RequestsApi for HttpRequestsApi {
    async fn fetch_records(&self, view: &ViewConfig) -> ApiResult<Vec<Record>> {
        let mut request = Client::get(self.config.api_url());
        if let Some(sheet) = view.sheet {
            request = request.query("sheet", sheet);
        }
        let response = request
            .query("callback", view.callback)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.is_success() {
            warn!("Fetching {} returned status {}", view.kind, response.status);
            return Err(ApiError::Status(response.status));
        }

        let records = parse_records(&response.text_lossy(), view.callback)?;
        info!("Fetched {} records for {}", records.len(), view.kind);
        Ok(records)
    }

    async fn submit(&self, mutation: &Mutation) -> ApiResult<()> {
        let response = Client::post(self.config.api_url())
            .form(mutation.form_pairs())
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.is_success() {
            warn!(
                "Submitting {} returned status {}",
                mutation.describe(),
                response.status
            );
            return Err(ApiError::Status(response.status));
        }

        info!(
            "Submitted {} for {}",
            mutation.describe(),
            mutation.id().as_deref().unwrap_or("new request")
        );
        Ok(())
    }
}

/// Decode a records body, unwrapping a `callback(...)` JSONP wrapper if present.
///
/// A `null` payload is an empty set.
pub fn parse_records(body: &str, callback: &str) -> ApiResult<Vec<Record>> {
    let json = unwrap_jsonp(body, callback)?;
    let records: Option<Vec<Record>> =
        serde_json::from_str(json).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(records.unwrap_or_default())
}

fn unwrap_jsonp<'a>(body: &'a str, callback: &str) -> ApiResult<&'a str> {
    let trimmed = body.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') || trimmed == "null" {
        return Ok(trimmed);
    }

    let script = trimmed.trim_end_matches(';').trim_end();
    let open = script
        .find('(')
        .ok_or_else(|| ApiError::Decode("response is neither JSON nor JSONP".to_owned()))?;
    let name = script
        .get(..open)
        .unwrap_or_default()
        .trim()
        .trim_start_matches("/**/")
        .trim();
    if name != callback {
        debug!("JSONP callback {name:?} differs from requested {callback:?}");
    }

    script
        .strip_suffix(')')
        .and_then(|s| s.get(open + 1..))
        .ok_or_else(|| ApiError::Decode("unterminated JSONP call".to_owned()))
}
