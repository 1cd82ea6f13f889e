// src/config.rs
use crate::api::{NotionApiRepository, NotionHttpClient};
use crate::constants::{DEFAULT_MAX_DEPTH, NOTION_API_BASE_URL};
use crate::error::AppError;
use crate::types::{ApiKey, MaxDepth};
use clap::{Parser, ValueEnum};

pub const API_KEY_ENV: &str = "NOTION_API_KEY";
pub const MAX_DEPTH_ENV: &str = "NOTION_MAX_DEPTH";
pub const DEBUG_ENV: &str = "NOTION_DEBUG";

/// How the CLI prints the block tree.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented `- type: text` lines
    #[default]
    Text,
    /// Pretty-printed JSON, one dictionary per top-level block
    Json,
}

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about = "Retrieve and display Notion page content", long_about = None)]
pub struct CommandLineInput {
    /// URL or ID of the Notion page to retrieve
    pub url: String,

    /// Notion API key (defaults to the NOTION_API_KEY environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Log every API response body
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Maximum recursion depth for fetching nested blocks (0 to 50)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Output format for the page content. Paragraphs, headings, list
    /// items, to-dos, toggles, quotes and callouts print with their text;
    /// other blocks print their type only.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Resolved service configuration: validated and ready to build a client.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: ApiKey,
    pub max_depth: MaxDepth,
    pub debug: bool,
    pub base_url: String,
}

impl ServiceConfig {
    /// Resolves configuration from CLI input, falling back to
    /// `NOTION_API_KEY` when no key was passed.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// [`resolve`](Self::resolve) with an explicit environment lookup.
    pub fn resolve_with(
        cli: &CommandLineInput,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let raw_key = match &cli.api_key {
            Some(key) => key.clone(),
            None => env(API_KEY_ENV).ok_or_else(missing_api_key)?,
        };

        Ok(Self {
            api_key: ApiKey::new(raw_key)?,
            max_depth: MaxDepth::new(cli.max_depth)?,
            debug: cli.debug,
            base_url: NOTION_API_BASE_URL.to_string(),
        })
    }

    /// Configuration for the MCP server, read entirely from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = ApiKey::new(env(API_KEY_ENV).ok_or_else(missing_api_key)?)?;

        let max_depth = match env(MAX_DEPTH_ENV) {
            Some(raw) => {
                let depth = raw.trim().parse::<usize>().map_err(|_| {
                    AppError::MissingConfiguration(format!(
                        "{} must be a non-negative integer, got '{}'",
                        MAX_DEPTH_ENV, raw
                    ))
                })?;
                MaxDepth::new(depth)?
            }
            None => MaxDepth::default(),
        };

        let debug = env(DEBUG_ENV)
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_key,
            max_depth,
            debug,
            base_url: NOTION_API_BASE_URL.to_string(),
        })
    }

    /// Builds the HTTP transport described by this configuration.
    pub fn http_client(&self) -> Result<NotionHttpClient, AppError> {
        let client = NotionHttpClient::with_base_url(&self.api_key, self.base_url.as_str())?;
        Ok(client.with_debug(self.debug))
    }

    /// Builds a repository over a fresh HTTP transport.
    pub fn repository(&self) -> Result<NotionApiRepository<NotionHttpClient>, AppError> {
        Ok(NotionApiRepository::with_max_depth(
            self.http_client()?,
            self.max_depth,
        ))
    }
}

fn missing_api_key() -> AppError {
    AppError::MissingConfiguration(format!(
        "No Notion API key provided. Set {} environment variable or use --api-key option.",
        API_KEY_ENV
    ))
}
