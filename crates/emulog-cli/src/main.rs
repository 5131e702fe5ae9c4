use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use sha2::{Digest, Sha256};

use emulog_core::api::{MarkdownSanitizer, StaticCatalog};
use emulog_core::parser::{FeedStatus, LogParser};
use emulog_core::report::model::EmbedReport;
use emulog_core::triggers::TriggerList;

mod args;

/// JSON output envelope: the structured report plus the identity of the
/// exact log bytes it was derived from.
#[derive(Debug, Serialize)]
struct Envelope {
    schema_version: &'static str,
    tool: ToolInfo,
    log: LogFileInfo,
    report: EmbedReport,
}

#[derive(Debug, Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct LogFileInfo {
    path: String,
    size_bytes: u64,
    sha256: String,
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: Option<&Path>, what: &str) -> Result<T> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {what} file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {what} file {}", path.display()))
        }
        None => Ok(T::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();

    let catalog: StaticCatalog = load_json(args.catalog.as_deref(), "catalog")?;
    let triggers: TriggerList = load_json(args.triggers.as_deref(), "trigger list")?;

    let bytes = fs::read(&args.log_path)
        .with_context(|| format!("failed to read log file {}", args.log_path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut parser = LogParser::new(triggers, Box::new(catalog), Box::new(MarkdownSanitizer));
    let mut last = FeedStatus::Success;
    for line in text.lines() {
        last = parser.feed(line);
        if last != FeedStatus::Success {
            break;
        }
    }

    let exit_code = match last {
        FeedStatus::Stop => {
            let output = match args.format {
                args::OutputFormat::Text => parser.text_report()?,
                args::OutputFormat::Json => {
                    let envelope = Envelope {
                        schema_version: emulog_core::SCHEMA_VERSION,
                        tool: ToolInfo {
                            name: emulog_core::TOOL_NAME,
                            version: env!("CARGO_PKG_VERSION"),
                        },
                        log: LogFileInfo {
                            path: args.log_path.display().to_string(),
                            size_bytes: bytes.len() as u64,
                            sha256: hex::encode(Sha256::digest(&bytes)),
                        },
                        report: parser.embed_report()?,
                    };
                    serde_json::to_string_pretty(&envelope)?
                }
            };
            match args.out {
                Some(path) => fs::write(path, &output)?,
                None => println!("{output}"),
            }
            0
        }
        FeedStatus::Piracy => {
            println!("Prohibited content detected: {}", parser.trigger());
            1
        }
        FeedStatus::Overflow => {
            eprintln!("log section exceeded the buffer ceiling before a phase boundary");
            2
        }
        FeedStatus::Fail => {
            eprintln!(
                "log did not match the expected format (phase {})",
                parser.phase_index()
            );
            2
        }
        FeedStatus::Success => {
            eprintln!("log ended before the final section was reached");
            2
        }
    };

    std::process::exit(exit_code);
}
