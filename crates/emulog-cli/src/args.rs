use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "emulog",
    version,
    about = "Structured report extraction for emulator diagnostic logs"
)]
pub struct Args {
    /// Path to the diagnostic log file
    pub log_path: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// JSON product database (serial -> title/status)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// JSON array of prohibited-content trigger substrings
    #[arg(long)]
    pub triggers: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
