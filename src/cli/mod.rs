use crate::secrets::DocumentFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "encsecret",
    version,
    about = "Resolve ENC[handle] secret placeholders in configuration documents"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, env = "ENCSECRET_LOG_JSON")]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every placeholder and write the resulting document.
    Decrypt(DecryptOpts),
    /// List placeholders without contacting the secret backend.
    Scan(ScanOpts),
    Config(ConfigOpts),
    Version,
}

#[derive(clap::Args)]
pub struct DecryptOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    /// Input document, `-` for stdin.
    pub input: PathBuf,
    /// Output file, stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Document format; guessed from the input extension when omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<DocumentFormat>,
}

#[derive(clap::Args)]
pub struct ScanOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    /// Input document, `-` for stdin.
    pub input: PathBuf,
    #[arg(short, long, value_enum)]
    pub format: Option<DocumentFormat>,
}

#[derive(clap::Args)]
pub struct ConfigOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Validate,
}

/// Format given on the command line, else guessed from the input path.
pub fn effective_format(explicit: Option<DocumentFormat>, input: &std::path::Path) -> DocumentFormat {
    explicit.unwrap_or_else(|| DocumentFormat::from_path(input))
}
