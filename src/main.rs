// src/main.rs
use clap::Parser;
use scribeagent::config::{CommandLineInput, OutputFormat, ServiceConfig};
use scribeagent::formatting::{format_as_text, tree_as_dicts};
use scribeagent::logging::{setup_logging, LogTarget};
use scribeagent::{AppError, NotionPageService, PageWithContent};
use std::process::ExitCode;

fn display_timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339())
}

/// Fetches the page and prints its metadata followed by its content.
async fn notion_get_page(cli: &CommandLineInput) -> Result<(), AppError> {
    let config = ServiceConfig::resolve(cli)?;
    log::info!(
        "Fetching {} (max depth {}, key {})",
        cli.url,
        config.max_depth,
        config.api_key
    );

    let service = NotionPageService::new(config.repository()?);
    let PageWithContent { page, content } = service.get_page_with_content(&cli.url).await?;

    println!("Page Title: {}", page.get_title());
    println!("URL: {}", page.url);
    println!("Created: {}", display_timestamp(page.created_time));
    println!("Last Edited: {}", display_timestamp(page.last_edited_time));

    println!();
    println!("Page Content:");
    match cli.format {
        OutputFormat::Text => print!("{}", format_as_text(&content)?),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tree_as_dicts(&content))?)
        }
    }

    if !content.truncated().is_empty() {
        eprintln!(
            "Maximum recursion depth ({}) reached. {} block(s) have unfetched children.",
            config.max_depth,
            content.truncated().len()
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose || cli.debug, LogTarget::Stdout) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match notion_get_page(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            println!("Error: {}", e);
            if e.remote_status() == Some(404) {
                println!("Make sure the page is shared with your Notion integration.");
            }
            ExitCode::FAILURE
        }
    }
}
