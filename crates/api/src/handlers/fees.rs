//! Fee estimation and comparison handlers

use axum::{
	extract::{Path, Query, State},
	response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trinity_service::PlannerError;
use trinity_types::{
	ChainComparison, ChainId, ComparisonSavings, FeeEstimate, FeeHistoryRecord, OperationKind,
	OperationRecommendation,
};
#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::handlers::common::{parse_chain, planner_error, ApiError};
#[cfg(feature = "openapi")]
use crate::handlers::common::ErrorResponse;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct OperationQuery {
	/// Operation kind; defaults to vault_creation
	pub operation_type: Option<String>,
}

impl OperationQuery {
	fn operation(&self) -> OperationKind {
		OperationKind::from_param(self.operation_type.as_deref())
	}
}

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct HistoryQuery {
	/// Number of records, newest first
	pub limit: Option<usize>,
}

/// Per-chain estimates plus the cheapest chain
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeeComparisonResponse {
	pub operation_type: OperationKind,
	pub ethereum: FeeEstimate,
	pub solana: FeeEstimate,
	pub ton: FeeEstimate,
	pub recommendation: ChainId,
	pub savings: ComparisonSavings,
}

impl TryFrom<ChainComparison> for FeeComparisonResponse {
	type Error = PlannerError;

	fn try_from(mut comparison: ChainComparison) -> Result<Self, Self::Error> {
		let mut take = |chain: ChainId| {
			comparison
				.estimates
				.remove(&chain)
				.ok_or(PlannerError::NoEstimates)
		};
		let ethereum = take(ChainId::Ethereum)?;
		let solana = take(ChainId::Solana)?;
		let ton = take(ChainId::Ton)?;

		Ok(Self {
			operation_type: comparison.operation_type,
			ethereum,
			solana,
			ton,
			recommendation: comparison.recommended_chain,
			savings: comparison.savings,
		})
	}
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeeHistoryResponse {
	pub chain: ChainId,
	pub records: Vec<FeeHistoryRecord>,
}

/// GET /api/chain/fees/compare - Compare one operation across all chains
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/chain/fees/compare",
	params(OperationQuery),
	responses((status = 200, description = "Fee comparison", body = FeeComparisonResponse)),
	tag = "fees"
))]
pub async fn compare_fees(
	State(state): State<AppState>,
	Query(query): Query<OperationQuery>,
) -> Result<Json<FeeComparisonResponse>, ApiError> {
	let operation = query.operation();
	info!("Comparing {} fees across chains", operation);

	let report = state
		.planner
		.comparator()
		.compare_all(&operation)
		.await
		.map_err(planner_error)?;
	state.records.record_comparison(&report).await;

	let response = FeeComparisonResponse::try_from(report.comparison).map_err(planner_error)?;
	Ok(Json(response))
}

/// GET /api/chain/fees/{chain} - Estimate one operation on one chain
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/chain/fees/{chain}",
	params(("chain" = String, Path, description = "ethereum, solana or ton"), OperationQuery),
	responses(
		(status = 200, description = "Fee estimate", body = FeeEstimate),
		(status = 400, description = "Unsupported chain", body = ErrorResponse)
	),
	tag = "fees"
))]
pub async fn get_chain_fee(
	State(state): State<AppState>,
	Path(chain): Path<String>,
	Query(query): Query<OperationQuery>,
) -> Result<Json<FeeEstimate>, ApiError> {
	let chain = parse_chain(&chain)?;
	let operation = query.operation();
	debug!("Estimating {} on {}", operation, chain);

	let outcome = state.estimator.estimate(chain, &operation).await;
	Ok(Json(outcome.into_estimate()))
}

/// GET /api/chain/fees/recommendation/{operationType} - Cheapest chain for an operation
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/chain/fees/recommendation/{operationType}",
	params(("operationType" = String, Path, description = "Operation kind, e.g. vault_creation")),
	responses((status = 200, description = "Recommendation", body = OperationRecommendation)),
	tag = "fees"
))]
pub async fn get_fee_recommendation(
	State(state): State<AppState>,
	Path(operation_type): Path<String>,
) -> Result<Json<OperationRecommendation>, ApiError> {
	let operation = OperationKind::new(operation_type);
	let (recommendation, report) = state
		.planner
		.recommendation_for(&operation)
		.await
		.map_err(planner_error)?;
	state.records.record_comparison(&report).await;
	Ok(Json(recommendation))
}

/// GET /api/chain/fees/history/{chain} - Most recent stored estimates
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/chain/fees/history/{chain}",
	params(("chain" = String, Path, description = "ethereum, solana or ton"), HistoryQuery),
	responses(
		(status = 200, description = "Stored estimates, newest first", body = FeeHistoryResponse),
		(status = 400, description = "Unsupported chain", body = ErrorResponse)
	),
	tag = "fees"
))]
pub async fn get_fee_history(
	State(state): State<AppState>,
	Path(chain): Path<String>,
	Query(query): Query<HistoryQuery>,
) -> Result<Json<FeeHistoryResponse>, ApiError> {
	let chain = parse_chain(&chain)?;
	let records = state
		.records
		.fee_history(chain, query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
		.await
		.map_err(planner_error)?;
	Ok(Json(FeeHistoryResponse { chain, records }))
}
