// src/logging.rs
//! log4rs setup shared by both binaries.

use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "scribeagent.log";
/// Dependencies whose debug output drowns out ours.
const QUIET_CRATES: &[&str] = &["hyper", "hyper_util", "h2", "rustls", "reqwest"];

const DETAILED_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}";

/// Where console log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Keeps stdout free for protocol traffic.
    Stderr,
}

/// Path of the debug log file.
pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs a console appender at Warn (Debug when `verbose`) plus a file
/// appender that always records Debug and above.
pub fn setup_logging(verbose: bool, target: LogTarget) -> Result<(), Box<dyn std::error::Error>> {
    let log_file_path = log_file_path();
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose { DETAILED_PATTERN } else { "{m}{n}" };

    let console_appender = ConsoleAppender::builder()
        .target(match target {
            LogTarget::Stdout => Target::Stdout,
            LogTarget::Stderr => Target::Stderr,
        })
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DETAILED_PATTERN)))
        .build(&log_file_path)?;

    let mut builder = Config::builder();
    for name in QUIET_CRATES {
        builder = builder.logger(Logger::builder().build(*name, LevelFilter::Info));
    }

    let config = builder
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(console_level(verbose))))
                .build("console", Box::new(console_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}
