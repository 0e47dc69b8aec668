//! Trinity Planner Server
//!
//! Main entry point for the vault deployment planner

use trinity_planner::PlannerBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	PlannerBuilder::new().start_server().await
}
