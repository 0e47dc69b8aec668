use axum::{
	routing::{get, post},
	Router,
};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{
	compare_fees, get_chain_fee, get_chain_info, get_fee_history, get_fee_recommendation,
	get_recommendation, health, post_plan, post_validate, ready,
};
use crate::security::add_security_headers;
use crate::state::AppState;
#[cfg(feature = "openapi")]
use crate::openapi::ApiDoc;
#[cfg(feature = "openapi")]
use utoipa::OpenApi;
#[cfg(feature = "openapi")]
use utoipa_swagger_ui::SwaggerUi;

/// Request bodies are small JSON documents
const BODY_LIMIT_BYTES: usize = 64 * 1024;

pub fn create_router() -> Router<AppState> {
	let cors = CorsLayer::permissive();
	let body_limit = RequestBodyLimitLayer::new(BODY_LIMIT_BYTES);
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let chain_api = Router::new()
		.route("/fees/compare", get(compare_fees))
		.route("/fees/recommendation/{operation_type}", get(get_fee_recommendation))
		.route("/fees/history/{chain}", get(get_fee_history))
		.route("/fees/{chain}", get(get_chain_fee))
		.route("/plan", post(post_plan))
		.route("/validate", post(post_validate))
		.route("/recommend", get(get_recommendation))
		.route("/info/{chain}", get(get_chain_info));

	let base_router = Router::new()
		.route("/health", get(health))
		.route("/ready", get(ready))
		.nest("/api/chain", chain_api);

	#[cfg(feature = "openapi")]
	let router = base_router
		.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

	#[cfg(not(feature = "openapi"))]
	let router = base_router;

	let router = router
		.layer(cors)
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		.layer(body_limit);

	add_security_headers(router)
}
