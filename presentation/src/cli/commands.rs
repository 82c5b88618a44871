//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Model provider selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Google Gemini (needs GOOGLE_API_KEY or --api-key)
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl ProviderArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderArg::Gemini => "gemini",
            ProviderArg::Ollama => "ollama",
        }
    }
}

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-company summary
    Summary,
    /// The audit JSON as written to the results file
    Json,
}

impl From<OutputFormat> for footing_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => footing_domain::OutputFormat::Summary,
            OutputFormat::Json => footing_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for footing-quorum
#[derive(Parser, Debug)]
#[command(name = "footing-quorum")]
#[command(author, version, about = "Financial statement footing audit by multi-agent consensus")]
#[command(long_about = r#"
Footing Quorum audits financial statements with several independent LLM agents.

For every statement document, N agents (3 by default) extract each line item's
reported value and recomputed value. Results are accepted only when all agents
agree within a relative tolerance of 0.01%; otherwise the round is retried.

Input files are read from the input directory:
  <COMPANY>_posisi_keuangan.txt   statement of financial position
  <COMPANY>_laba_rugi.txt         income statement
  <COMPANY>_arus_kas.txt          cash flow statement

Configuration files are loaded from (in priority order):
1. FOOTING_* environment variables
2. --config <path>     Explicit config file
3. ./footing.toml      Project-level config
4. ~/.config/footing-quorum/config.toml   Global config

Example:
  footing-quorum --provider ollama --model qwen3:4b
  footing-quorum --provider gemini --company ADRO --retries 3
  footing-quorum --concurrency 4 --output json
"#)]
pub struct Cli {
    /// Model provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name (provider default when omitted)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Audit only this company (all detected companies otherwise)
    #[arg(short, long, value_name = "COMPANY")]
    pub company: Vec<String>,

    /// API key for providers that need one
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Provider base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Maximum retry rounds after the first
    #[arg(short, long, value_name = "N")]
    pub retries: Option<usize>,

    /// Number of agents per round
    #[arg(short, long, value_name = "N")]
    pub agents: Option<usize>,

    /// Relative consensus tolerance (0.0001 = 0.01%)
    #[arg(short, long, value_name = "T")]
    pub tolerance: Option<f64>,

    /// Directory with statement documents
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory for audit result files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Companies audited at the same time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Debug logging (same as -vv)
    #[arg(long)]
    pub debug: bool,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Plain output without ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Tracing filter level from `-v` count and `--debug`
    pub fn log_level(&self) -> &'static str {
        match (self.verbose, self.debug) {
            (0, false) => "warn",
            (1, false) => "info",
            (0..=2, _) => "debug",
            _ => "trace",
        }
    }
}
