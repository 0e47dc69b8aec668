use utoipa::OpenApi;

use crate::handlers::common::ErrorResponse;
use crate::handlers::fees::{FeeComparisonResponse, FeeHistoryResponse};
use crate::handlers::health::ReadinessResponse;
use crate::handlers::{chains, fees, health, plans};
use trinity_types::{
	ChainInfo, ChainRecommendation, FeeEstimate, OperationRecommendation, PlanRequest,
	SelectionRequest, SelectionValidation, VaultCreationPlan,
};

#[derive(OpenApi)]
#[openapi(
	paths(
		health::health,
		health::ready,
		fees::compare_fees,
		fees::get_chain_fee,
		fees::get_fee_recommendation,
		fees::get_fee_history,
		plans::post_plan,
		plans::post_validate,
		plans::get_recommendation,
		chains::get_chain_info,
	),
	components(schemas(
		ErrorResponse,
		ReadinessResponse,
		FeeComparisonResponse,
		FeeHistoryResponse,
		FeeEstimate,
		OperationRecommendation,
		PlanRequest,
		VaultCreationPlan,
		SelectionRequest,
		SelectionValidation,
		ChainRecommendation,
		ChainInfo,
	)),
	tags(
		(name = "fees", description = "Fee estimation and comparison"),
		(name = "plans", description = "Vault deployment planning and advice"),
		(name = "chains", description = "Chain metadata"),
		(name = "health", description = "Health and readiness endpoints")
	)
)]
pub struct ApiDoc;
