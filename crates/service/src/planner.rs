//! Vault deployment planning
//!
//! Combines the chain comparison with role assignment into one plan, and
//! offers advisory selection checks and preference-based recommendations.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};
use trinity_config::{Settings, ValidationSettings};
use trinity_types::{
	ChainId, ChainRecommendation, CongestionLevel, OperationKind, OperationRecommendation,
	PlanParameters, PlanRequest, PreferenceQuery, SecurityConfig, SelectionRequest,
	SelectionValidation, VaultCreationPlan,
};

use crate::comparator::{ChainComparator, ComparisonReport};
use crate::errors::PlannerError;
use crate::roles::TrinityRoleAssigner;

/// Fastest confirmations
const SPEED_CHAIN: ChainId = ChainId::Solana;
/// Deepest validator set
const SECURITY_CHAIN: ChainId = ChainId::Ethereum;
/// Balanced choice when no preference is given
const BALANCED_CHAIN: ChainId = ChainId::Ton;

/// A plan together with the comparison it was built from
#[derive(Debug, Clone)]
pub struct PlanReport {
	pub plan: VaultCreationPlan,
	pub comparison: ComparisonReport,
}

#[derive(Clone)]
pub struct VaultDeploymentPlanner {
	comparator: ChainComparator,
	roles: TrinityRoleAssigner,
	validation: ValidationSettings,
}

impl VaultDeploymentPlanner {
	pub fn new(comparator: ChainComparator, roles: TrinityRoleAssigner, settings: &Settings) -> Self {
		Self {
			comparator,
			roles,
			validation: settings.validation.clone(),
		}
	}

	pub fn comparator(&self) -> &ChainComparator {
		&self.comparator
	}

	pub fn roles(&self) -> &TrinityRoleAssigner {
		&self.roles
	}

	/// Validate the request, then plan
	///
	/// Invalid chains and security levels are rejected before any estimate
	/// is requested.
	pub async fn plan(&self, request: &PlanRequest) -> Result<PlanReport, PlannerError> {
		let params = request.validate()?;
		self.plan_for(params).await
	}

	pub async fn plan_for(&self, params: PlanParameters) -> Result<PlanReport, PlannerError> {
		let PlanParameters {
			primary_chain,
			operation,
			security_level,
			vault,
		} = params;

		let (report, assignment) = tokio::join!(
			self.comparator.compare_all(&operation),
			async { self.roles.assign(primary_chain) }
		);
		let report = report?;
		let comparison = &report.comparison;

		let selected_fee = comparison
			.estimate(primary_chain)
			.cloned()
			.ok_or(PlannerError::NoEstimates)?;
		let cheapest_fee = comparison.cheapest().cloned().ok_or(PlannerError::NoEstimates)?;
		let savings = self
			.roles
			.calculate_fee_savings(primary_chain, &comparison.fee_usd_by_chain());
		let requirements = self.roles.requires_verification(primary_chain, security_level);

		let plan = VaultCreationPlan {
			primary_chain,
			operation_type: operation,
			vault,
			deployment_priority: self.roles.deployment_priority(&assignment.roles),
			trinity: assignment,
			fee_estimates: comparison.estimates.clone(),
			selected_fee,
			recommended_chain: comparison.recommended_chain,
			cheapest_fee,
			savings,
			security_config: SecurityConfig::new(security_level, requirements),
		};

		info!(
			"Planned vault on {} at security level {}: {} confirmations, cheapest {}",
			plan.primary_chain,
			security_level,
			plan.security_config.required_confirmations,
			plan.recommended_chain
		);

		Ok(PlanReport {
			plan,
			comparison: report,
		})
	}

	/// Advisory check of a chain selection; the result is always `valid`
	pub async fn validate_selection(
		&self,
		request: &SelectionRequest,
	) -> Result<(SelectionValidation, ComparisonReport), PlannerError> {
		let chain = ChainId::from_str(&request.primary_chain)?;
		let operation = OperationKind::from_param(request.operation_type.as_deref());
		let report = self.comparator.compare_all(&operation).await?;
		let comparison = &report.comparison;
		let selected = comparison.estimate(chain).ok_or(PlannerError::NoEstimates)?;

		let mut warnings = Vec::new();
		let mut recommendations = Vec::new();

		if selected.estimated_fee_usd > self.validation.max_fee_usd {
			warnings.push(format!(
				"High fee on {}: ${} exceeds ${}",
				chain.display_name(),
				selected.estimated_fee_usd.round_dp(2),
				self.validation.max_fee_usd
			));
		}

		if let Some(balance) = request.user_balance {
			let required = selected
				.estimated_fee
				.checked_mul(self.validation.balance_multiple)
				.unwrap_or(Decimal::MAX);
			if balance < required {
				warnings.push(format!(
					"Insufficient balance: {} {} is below {}x the estimated fee of {} {}",
					balance,
					selected.symbol(),
					self.validation.balance_multiple,
					selected.estimated_fee,
					selected.symbol()
				));
			}
		}

		if selected.network_congestion == CongestionLevel::High {
			warnings.push(format!(
				"{} network congestion is high; confirmation may take about {}s",
				chain.display_name(),
				selected.estimated_time
			));
		}

		if comparison.recommended_chain != chain {
			if let Some(cheapest) = comparison.cheapest() {
				recommendations.push(format!(
					"{} is cheaper for {}: ${} vs ${}",
					cheapest.chain.display_name(),
					operation,
					cheapest.estimated_fee_usd,
					selected.estimated_fee_usd
				));
			}
		}

		debug!(
			"Validated {} selection: {} warnings, {} recommendations",
			chain,
			warnings.len(),
			recommendations.len()
		);

		Ok((
			SelectionValidation {
				valid: true,
				warnings,
				recommendations,
			},
			report,
		))
	}

	/// Pick a chain from soft preferences; the first matching preference wins
	/// in the order speed, cost, security
	pub async fn recommend(&self, query: &PreferenceQuery) -> Result<ChainRecommendation, PlannerError> {
		let (recommended, reason) = if query.prefer_speed {
			(
				SPEED_CHAIN,
				format!(
					"{} offers the fastest confirmations, typically within seconds",
					SPEED_CHAIN.display_name()
				),
			)
		} else if query.prefer_cost {
			let operation = OperationKind::from_param(query.operation_type.as_deref());
			let report = self.comparator.compare_all(&operation).await?;
			let cheapest = report.comparison.recommended_chain;
			(
				cheapest,
				format!(
					"{} has the lowest fee for {}, saving {}% against the most expensive chain",
					cheapest.display_name(),
					operation,
					report.comparison.savings.percent
				),
			)
		} else if query.prefer_security {
			(
				SECURITY_CHAIN,
				format!(
					"{} has the largest validator set and longest security track record",
					SECURITY_CHAIN.display_name()
				),
			)
		} else {
			(
				BALANCED_CHAIN,
				format!(
					"{} balances low fees with fast finality",
					BALANCED_CHAIN.display_name()
				),
			)
		};

		let alternatives = ChainId::ALL
			.into_iter()
			.filter(|chain| *chain != recommended)
			.collect();

		Ok(ChainRecommendation {
			recommended,
			reason,
			alternatives,
		})
	}

	/// Cheapest chain for an operation with savings against the baseline chain
	pub async fn recommendation_for(
		&self,
		operation: &OperationKind,
	) -> Result<(OperationRecommendation, ComparisonReport), PlannerError> {
		let report = self.comparator.compare_all(operation).await?;
		let comparison = &report.comparison;
		let recommended = comparison.recommended_chain;
		let savings_vs_baseline = self
			.roles
			.calculate_fee_savings(recommended, &comparison.fee_usd_by_chain());

		let recommendation = OperationRecommendation {
			recommended,
			reason: format!(
				"{} is the cheapest chain for {} at ${}",
				recommended.display_name(),
				operation,
				comparison
					.estimate(recommended)
					.map(|estimate| estimate.estimated_fee_usd)
					.unwrap_or_default()
			),
			savings_vs_baseline,
			all_options: comparison.ranked_estimates(),
		};
		Ok((recommendation, report))
	}
}
