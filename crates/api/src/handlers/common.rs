//! Error responses and request parsing shared by handlers

use axum::{
	extract::{rejection::JsonRejection, FromRequest, Request},
	http::StatusCode,
	response::Json,
};
use serde::Serialize;
use std::str::FromStr;
use trinity_service::PlannerError;
use trinity_types::{ChainId, PlanValidationError};
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Error response format shared by handlers
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub timestamp: i64,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
	(
		status,
		Json(ErrorResponse {
			error: error.to_string(),
			message: message.into(),
			timestamp: chrono::Utc::now().timestamp(),
		}),
	)
}

/// Map service errors onto HTTP statuses
pub fn planner_error(error: PlannerError) -> ApiError {
	match &error {
		PlannerError::InvalidRequest(PlanValidationError::Chain(_)) => {
			error_response(StatusCode::BAD_REQUEST, "INVALID_CHAIN", error.to_string())
		},
		PlannerError::InvalidRequest(PlanValidationError::SecurityLevel(_)) => {
			error_response(StatusCode::BAD_REQUEST, "INVALID_SECURITY_LEVEL", error.to_string())
		},
		PlannerError::InvalidRequest(PlanValidationError::InvalidAmount { .. }) => {
			error_response(StatusCode::BAD_REQUEST, "INVALID_AMOUNT", error.to_string())
		},
		PlannerError::NoEstimates => {
			error_response(StatusCode::INTERNAL_SERVER_ERROR, "ESTIMATION_ERROR", error.to_string())
		},
		PlannerError::Storage(_) => {
			error_response(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", error.to_string())
		},
	}
}

/// JSON body extractor answering malformed bodies with an `ErrorResponse`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
	Json<T>: FromRequest<S, Rejection = JsonRejection>,
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		Json::<T>::from_request(req, state)
			.await
			.map(|Json(value)| Self(value))
			.map_err(|rejection| {
				error_response(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
			})
	}
}

/// Parse a chain path segment, answering 400 outside the supported set
pub fn parse_chain(raw: &str) -> Result<ChainId, ApiError> {
	ChainId::from_str(raw).map_err(|e| planner_error(PlannerError::from(e)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use trinity_types::SecurityLevel;

	#[test]
	fn test_client_errors_map_to_bad_request() {
		let (status, body) = parse_chain("dogecoin").unwrap_err();
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.error, "INVALID_CHAIN");
		assert!(body.message.contains("ethereum"));

		let level = SecurityLevel::new(9).unwrap_err();
		let (status, body) = planner_error(PlannerError::from(PlanValidationError::from(level)));
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.error, "INVALID_SECURITY_LEVEL");
	}

	#[test]
	fn test_internal_errors_map_to_server_error() {
		let (status, body) = planner_error(PlannerError::NoEstimates);
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body.error, "ESTIMATION_ERROR");
		assert_eq!(parse_chain(" TON ").unwrap(), ChainId::Ton);
	}
}
