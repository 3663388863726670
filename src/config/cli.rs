use clap::Parser;
use std::path::PathBuf;

/// Command-line flags; every setting can also come from the environment.
/// Unset values fall back to the `--config` file, then to built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "brandcheck")]
#[command(about = "Checks whether a brand is mentioned in LLM answers")]
pub struct CliArgs {
    #[arg(long, help = "Optional TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_URL", help = "Full generateContent URL, used verbatim")]
    pub api_url: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "GEMINI_FALLBACK_MODELS", value_delimiter = ',')]
    pub fallback_models: Vec<String>,

    #[arg(
        long,
        env = "GEMINI_PROBE_MODELS",
        help = "Probe the model list at startup and use the first that answers"
    )]
    pub probe_models: bool,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long)]
    pub max_output_tokens: Option<u32>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Maximum number of results kept for the session")]
    pub max_results: Option<usize>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}
