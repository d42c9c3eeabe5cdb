use super::error::ApiError;
use crate::core::{ConversionRecord, Converter, currency};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::debug;

pub fn router(converter: Converter) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/convert", post(convert))
        .route("/api/history", get(history))
        .route("/api/clear-history", post(clear_history))
        .route("/api/currencies", get(currencies))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(converter)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ApiError::Internal(anyhow::anyhow!("handler panicked: {message}")).into_response()
}

/// `amount` may arrive as a JSON number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConvertBody {
    amount: Option<AmountField>,
    from_currency: String,
    to_currency: String,
}

#[derive(Debug, Serialize)]
struct ConvertResponse {
    success: bool,
    #[serde(flatten)]
    record: ConversionRecord,
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "currencies": currency::list().len(),
    }))
}

async fn convert(
    State(converter): State<Converter>,
    payload: Result<Json<ConvertBody>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    debug!(?body, "Convert request");

    let amount = match body.amount {
        Some(AmountField::Number(n)) => n.to_string(),
        Some(AmountField::Text(s)) => s,
        None => String::new(),
    };
    let from = body.from_currency.trim().to_uppercase();
    let to = body.to_currency.trim().to_uppercase();

    let record = converter.convert(&amount, &from, &to).await?;
    Ok(Json(ConvertResponse {
        success: true,
        record,
    }))
}

async fn history(State(converter): State<Converter>) -> Json<Vec<ConversionRecord>> {
    Json(converter.history().load().await)
}

async fn clear_history(State(converter): State<Converter>) -> Result<Json<Value>, ApiError> {
    converter
        .history()
        .clear()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(Json(json!({ "success": true, "message": "History cleared" })))
}

async fn currencies() -> Json<currency::CurrencyList> {
    Json(currency::list())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
