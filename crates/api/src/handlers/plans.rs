//! Planning, selection validation and recommendation handlers

use axum::{
	extract::{Query, State},
	http::{HeaderName, HeaderValue},
	response::{AppendHeaders, IntoResponse, Json},
};
use tracing::info;
use trinity_types::{
	ChainRecommendation, PlanRequest, PreferenceQuery, SelectionRequest, SelectionValidation,
	VaultCreationPlan,
};

use crate::handlers::common::{planner_error, ApiError, ApiJson};
#[cfg(feature = "openapi")]
use crate::handlers::common::ErrorResponse;
use crate::state::AppState;

/// Id of the stored plan record, when the write succeeded
pub const PLAN_ID_HEADER: HeaderName = HeaderName::from_static("x-plan-id");

/// POST /api/chain/plan - Build a vault deployment plan
#[cfg_attr(feature = "openapi", utoipa::path(
	post,
	path = "/api/chain/plan",
	request_body = PlanRequest,
	responses(
		(status = 200, description = "Vault creation plan", body = VaultCreationPlan),
		(status = 400, description = "Invalid chain, security level or amount", body = ErrorResponse)
	),
	tag = "plans"
))]
pub async fn post_plan(
	State(state): State<AppState>,
	ApiJson(request): ApiJson<PlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
	info!(
		"Planning vault on {} at security level {}",
		request.primary_chain, request.security_level
	);
	let report = state.planner.plan(&request).await.map_err(planner_error)?;
	let plan: VaultCreationPlan = report.plan;

	let plan_id = state.records.record_plan(&plan).await;
	let headers = plan_id
		.and_then(|id| HeaderValue::from_str(&id).ok())
		.map(|value| (PLAN_ID_HEADER, value));

	Ok((AppendHeaders(headers), Json(plan)))
}

/// POST /api/chain/validate - Advisory check of a chain selection
#[cfg_attr(feature = "openapi", utoipa::path(
	post,
	path = "/api/chain/validate",
	request_body = SelectionRequest,
	responses(
		(status = 200, description = "Warnings and recommendations", body = SelectionValidation),
		(status = 400, description = "Unsupported chain", body = ErrorResponse)
	),
	tag = "plans"
))]
pub async fn post_validate(
	State(state): State<AppState>,
	ApiJson(request): ApiJson<SelectionRequest>,
) -> Result<Json<SelectionValidation>, ApiError> {
	let (validation, _) = state
		.planner
		.validate_selection(&request)
		.await
		.map_err(planner_error)?;
	Ok(Json(validation))
}

/// GET /api/chain/recommend - Pick a chain from preferences
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/chain/recommend",
	params(PreferenceQuery),
	responses((status = 200, description = "Recommended chain", body = ChainRecommendation)),
	tag = "plans"
))]
pub async fn get_recommendation(
	State(state): State<AppState>,
	Query(query): Query<PreferenceQuery>,
) -> Result<Json<ChainRecommendation>, ApiError> {
	let recommendation = state.planner.recommend(&query).await.map_err(planner_error)?;
	Ok(Json(recommendation))
}
