use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::Currency;
use crate::core::error::ConversionError;
use crate::core::rates::{RateProvider, Rates};

/// Client for the exchangerate-api.com `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("xconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: Rates,
}

fn request_error(e: reqwest::Error) -> ConversionError {
    if e.is_timeout() {
        ConversionError::Timeout
    } else {
        ConversionError::provider(e)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: Currency) -> Result<Rates, ConversionError> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(ConversionError::status(response.status().as_u16()));
        }

        let data: LatestRatesResponse = response.json().await.map_err(request_error)?;
        debug!("Received {} rates for {}", data.rates.len(), base);
        Ok(data.rates)
    }
}
