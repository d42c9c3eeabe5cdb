//! The conversion pipeline: validate, resolve a rate, compute, record.

use crate::core::currency::Currency;
use crate::core::error::ConversionError;
use crate::core::history::{ConversionHistory, ConversionRecord, RateSource};
use crate::core::rates::RateCache;
use crate::core::resolver::RateResolver;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Largest amount accepted for conversion.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// A conversion request whose amount and currencies have been validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
}

impl ConversionRequest {
    /// Validates the raw inputs, amount first, then both currency codes.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, ConversionError> {
        let amount = parse_amount(amount)?;
        let (Some(from), Some(to)) = (Currency::parse(from), Currency::parse(to)) else {
            return Err(ConversionError::InvalidCurrency);
        };
        Ok(Self { amount, from, to })
    }
}

fn parse_amount(text: &str) -> Result<f64, ConversionError> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidAmount)?;
    if amount.is_nan() {
        return Err(ConversionError::InvalidAmount);
    }
    if amount < 0.0 {
        return Err(ConversionError::NegativeAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(ConversionError::AmountTooLarge);
    }
    Ok(amount)
}

/// `amount * rate` rounded to two places, half to even.
///
/// Both factors are taken at their shortest decimal representation so that
/// e.g. `10 * 0.9337` rounds from exactly `9.337`.
pub fn round_to_cents(amount: f64, rate: f64) -> f64 {
    let exact = |v: f64| Decimal::from_str(&v.to_string()).ok();
    exact(amount)
        .zip(exact(rate))
        .and_then(|(a, r)| a.checked_mul(r))
        .map(|product| product.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or_else(|| (amount * rate * 100.0).round_ties_even() / 100.0)
}

/// Converts amounts between currencies, falling back to cached rates when
/// the provider is unavailable, and records each success in the history.
#[derive(Clone)]
pub struct Converter {
    resolver: RateResolver,
    cache: RateCache,
    history: ConversionHistory,
}

impl Converter {
    pub fn new(resolver: RateResolver, cache: RateCache, history: ConversionHistory) -> Self {
        Self {
            resolver,
            cache,
            history,
        }
    }

    pub fn history(&self) -> &ConversionHistory {
        &self.history
    }

    #[instrument(name = "Convert", skip(self))]
    pub async fn convert(
        &self,
        amount: &str,
        from: &str,
        to: &str,
    ) -> Result<ConversionRecord, ConversionError> {
        let request = ConversionRequest::parse(amount, from, to)?;
        let record = self.execute(request).await?;

        info!(
            "Converted {} {} to {} {} ({})",
            record.amount,
            record.from_currency,
            record.converted_amount,
            record.to_currency,
            record.source
        );
        self.history.record(record.clone()).await;
        Ok(record)
    }

    /// Runs a validated request without touching the history.
    pub async fn execute(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionRecord, ConversionError> {
        let ConversionRequest { amount, from, to } = request;

        let (converted_amount, rate, source) = if from == to {
            debug!("No currency conversion needed ({from} -> {to})");
            (amount, 1.0, RateSource::Same)
        } else {
            let (rate, source) = self.rate(from, to).await?;
            (round_to_cents(amount, rate), rate, source)
        };

        Ok(ConversionRecord {
            amount,
            from_currency: from.code().to_string(),
            to_currency: to.code().to_string(),
            converted_amount,
            exchange_rate: rate,
            source,
            timestamp: Utc::now(),
        })
    }

    /// One provider attempt, then a single look at the cache.
    async fn rate(
        &self,
        from: Currency,
        to: Currency,
    ) -> Result<(f64, RateSource), ConversionError> {
        let live = match self.resolver.resolve(from).await {
            Ok(snapshot) => snapshot.rate_for(to).ok_or_else(|| {
                ConversionError::ProviderError(format!("No exchange rate for {from} to {to}"))
            }),
            Err(e) => Err(e),
        };

        match live {
            Ok(rate) => Ok((rate, RateSource::Live)),
            Err(e) => match self.cache.snapshot().await.rate_for(to) {
                Some(rate) => {
                    info!("Using cached rate {rate} for {from} -> {to}");
                    Ok((rate, RateSource::Cached))
                }
                None => {
                    debug!("No cached rate for {to}");
                    Err(e)
                }
            },
        }
    }
}
