pub mod chains;
pub mod common;
pub mod fees;
pub mod health;
pub mod plans;

pub use chains::get_chain_info;
pub use fees::{compare_fees, get_chain_fee, get_fee_history, get_fee_recommendation};
pub use health::{health, ready};
pub use plans::{get_recommendation, post_plan, post_validate};
