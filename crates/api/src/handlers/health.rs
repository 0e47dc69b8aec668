use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check endpoint
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/health",
	responses((status = 200, description = "Service healthy", body = String)),
	tag = "health"
))]
pub async fn health() -> &'static str {
	"OK"
}

/// Readiness response
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
	pub status: String,
	pub storage_healthy: bool,
}

/// GET /ready - Readiness check backed by the record store
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/ready",
	responses(
		(status = 200, description = "Ready", body = ReadinessResponse),
		(status = 503, description = "Record store unavailable", body = ReadinessResponse)
	),
	tag = "health"
))]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
	let storage_healthy = state.records.is_healthy().await;
	let (code, status) = if storage_healthy {
		(StatusCode::OK, "ready")
	} else {
		(StatusCode::SERVICE_UNAVAILABLE, "degraded")
	};
	(
		code,
		Json(ReadinessResponse {
			status: status.to_string(),
			storage_healthy,
		}),
	)
}
