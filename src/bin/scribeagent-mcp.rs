// src/bin/scribeagent-mcp.rs
//! MCP server over stdio. Logs go to stderr and the log file only.

use scribeagent::config::ServiceConfig;
use scribeagent::logging::{setup_logging, LogTarget};
use scribeagent::McpServer;
use std::process::ExitCode;
use tokio::io::{stdin, stdout, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = setup_logging(config.debug, LogTarget::Stderr) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let repository = match config.repository() {
        Ok(repository) => repository,
        Err(e) => {
            log::error!("Could not create the Notion client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Serving MCP over stdio (max depth {})", config.max_depth);
    let server = McpServer::new(repository);
    match server.serve(BufReader::new(stdin()), stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("MCP server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
