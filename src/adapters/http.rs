use crate::core::{ConfigProvider, PremiumQuote, PremiumService, QuoteRequest};
use crate::utils::error::{QuoteError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// 以 reqwest 呼叫遠端保費計算 API
#[derive(Debug, Clone)]
pub struct HttpPremiumService {
    client: Client,
    endpoint: String,
}

impl HttpPremiumService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// 依設定建立 client：選用的逾時與額外標頭
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();

        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        if let Some(headers) = config.extra_headers() {
            let mut header_map = HeaderMap::new();
            for (key, value) in headers {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                    QuoteError::InvalidConfigValueError {
                        field: "service.headers".to_string(),
                        value: key.clone(),
                        reason: format!("Invalid header name: {}", e),
                    }
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    QuoteError::InvalidConfigValueError {
                        field: format!("service.headers.{}", key),
                        value: value.clone(),
                        reason: format!("Invalid header value: {}", e),
                    }
                })?;
                header_map.insert(name, value);
            }
            builder = builder.default_headers(header_map);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.api_endpoint().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PremiumService for HttpPremiumService {
    async fn calculate_premium(&self, request: &QuoteRequest) -> Result<PremiumQuote> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(QuoteError::StatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<PremiumQuote>(&body).map_err(|e| {
            tracing::debug!("Unexpected response body: {}", body);
            QuoteError::MalformedResponseError {
                message: e.to_string(),
            }
        })
    }
}
