//! Writes the OpenAPI document to a file without starting the server
//!
//! ```bash
//! cargo run -p trinity-api --bin generate_openapi --features openapi -- docs/api/openapi.json
//! ```

use std::env;
use std::fs;
use std::path::Path;

use trinity_api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let output_path = env::args()
		.nth(1)
		.unwrap_or_else(|| "docs/api/openapi.json".to_string());

	if let Some(parent) = Path::new(&output_path).parent() {
		fs::create_dir_all(parent)?;
	}

	let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
	fs::write(&output_path, json)?;
	println!("OpenAPI specification written to {}", output_path);
	Ok(())
}
