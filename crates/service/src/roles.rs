//! Trinity role assignment and verification policy
//!
//! Everything here is a pure function of the primary chain, the canonical
//! chain order and the security level.

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use trinity_config::Settings;
use trinity_types::{
	ChainId, ChainOrder, FeeSavings, RoleAssignment, SecurityLevel, TrinityRole, TrinityRoles,
	VerificationRequirements,
};

/// Lowest level that requires the first verifier
const FIRST_VERIFIER_LEVEL: u8 = 3;
/// Lowest level that requires both verifiers
const BOTH_VERIFIERS_LEVEL: u8 = 5;

#[derive(Debug, Clone)]
pub struct TrinityRoleAssigner {
	canonical: ChainOrder,
	baseline: ChainId,
}

impl TrinityRoleAssigner {
	pub fn new(canonical: ChainOrder, baseline: ChainId) -> Self {
		Self {
			canonical,
			baseline,
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self::new(settings.chains.canonical_order, settings.chains.baseline)
	}

	pub fn baseline(&self) -> ChainId {
		self.baseline
	}

	/// Verifiers are the canonical order with the primary removed
	pub fn roles(&self, primary: ChainId) -> TrinityRoles {
		let [verify1, verify2] = self.canonical.without(primary);
		TrinityRoles {
			primary,
			verify1,
			verify2,
		}
	}

	pub fn assign(&self, primary: ChainId) -> RoleAssignment {
		let roles = self.roles(primary);
		let responsibilities = roles
			.chains()
			.into_iter()
			.map(|chain| (chain, responsibility(chain, roles.role_of(chain))))
			.collect();

		RoleAssignment {
			description: format!(
				"{} holds the vault; {} and {} independently verify operations for 2-of-3 consensus",
				primary.display_name(),
				roles.verify1.display_name(),
				roles.verify2.display_name()
			),
			roles,
			responsibilities,
		}
	}

	/// Verifiers first in slot order, then the primary
	pub fn deployment_priority(&self, roles: &TrinityRoles) -> Vec<ChainId> {
		vec![roles.verify1, roles.verify2, roles.primary]
	}

	/// Which chains must confirm an operation at the given level
	///
	/// Levels 1-2 need no verifier, 3-4 need `verify1`, 5 needs both. The
	/// primary is never listed as required.
	pub fn requires_verification(&self, primary: ChainId, level: SecurityLevel) -> VerificationRequirements {
		let roles = self.roles(primary);
		let level = level.value();
		VerificationRequirements(BTreeMap::from([
			(roles.primary, false),
			(roles.verify1, level >= FIRST_VERIFIER_LEVEL),
			(roles.verify2, level >= BOTH_VERIFIERS_LEVEL),
		]))
	}

	/// Savings of the primary chain against the baseline chain, floored at zero
	pub fn calculate_fee_savings(
		&self,
		primary: ChainId,
		fee_usd_by_chain: &BTreeMap<ChainId, Decimal>,
	) -> FeeSavings {
		let fee_of = |chain: ChainId| fee_usd_by_chain.get(&chain).copied().unwrap_or_default();
		let selected_fee_usd = fee_of(primary);
		let baseline_fee_usd = fee_of(self.baseline);

		let savings = baseline_fee_usd
			.checked_sub(selected_fee_usd)
			.unwrap_or_default()
			.max(Decimal::ZERO);
		let percent_saved = if baseline_fee_usd.is_zero() {
			Decimal::ZERO
		} else {
			savings
				.checked_div(baseline_fee_usd)
				.and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
				.unwrap_or_default()
				.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
				.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
		};

		FeeSavings {
			selected_chain: primary,
			selected_fee_usd,
			baseline_chain: self.baseline,
			baseline_fee_usd,
			savings_usd: savings.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
			percent_saved,
		}
	}
}

impl Default for TrinityRoleAssigner {
	fn default() -> Self {
		Self::new(ChainOrder::canonical(), ChainId::Ethereum)
	}
}

fn responsibility(chain: ChainId, role: TrinityRole) -> String {
	let name = chain.display_name();
	match role {
		TrinityRole::Primary => {
			format!("{}: primary chain, holds vault state and executes user operations", name)
		},
		TrinityRole::Verify1 => {
			format!("{}: first verifier, confirms operations from security level 3", name)
		},
		TrinityRole::Verify2 => format!(
			"{}: second verifier and recovery chain, confirms operations at security level 5",
			name
		),
	}
}
