use actix_web::{get, http::StatusCode, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::response::ApiResponse;

/// Health check endpoint
///
/// Returns the current status of the API and timestamp. Needs no token.
#[get("/health")]
pub async fn health() -> HttpResponse {
    ApiResponse::success(
        StatusCode::OK,
        json!({
            "status": "ok",
            "timestamp": Utc::now()
        }),
        "API is running",
    )
    .into_response()
}
