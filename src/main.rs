//! HRMS engine HTTP server.

use std::sync::Arc;

use tracing::info;

use hrms_engine::api::{AppState, create_router};
use hrms_engine::config::ConfigLoader;
use hrms_engine::notify::TracingMailer;
use hrms_engine::services::HrmsContext;
use hrms_engine::store::{Dataset, Store};

const DEFAULT_CONFIG_DIR: &str = "./config/saudi";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        std::env::var("HRMS_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load_with_env(&config_dir)?.into_config();
    info!(config_dir = %config_dir, "Configuration loaded");

    let store = match std::env::var("HRMS_SEED_FILE") {
        Ok(path) => {
            let dataset = Dataset::from_json_file(&path)?;
            info!(
                seed_file = %path,
                employees = dataset.employees.len(),
                users = dataset.users.len(),
                "Seed dataset loaded"
            );
            Store::from_dataset(dataset)
        }
        Err(_) => Store::in_memory(),
    };

    let context = HrmsContext::new(store, config, Arc::new(TracingMailer))?;
    let app = create_router(AppState::new(context));

    let addr = std::env::var("HRMS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HRMS engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
