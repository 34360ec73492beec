//! RxHub
//!
//! MCP server for the pharmacy patient hub.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use rxhub::build_info;
use rxhub::config::HubConfig;
use rxhub::mcp::RxHubService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rxhub=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = HubConfig::from_env()?;
    match &config.form {
        Some(form) => tracing::info!(
            endpoint = %form.endpoint,
            timeout_secs = form.request_timeout.as_secs(),
            "Contact form delivery enabled"
        ),
        None => tracing::warn!("No form endpoint configured; contact form tools are disabled"),
    }

    let service = RxHubService::from_config(&config)?;

    eprintln!("Starting MCP server on stdio...");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
