//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tubesort_core::{Labels, SEQUENCE_LEN};
use tubesort_fetch::DEFAULT_API_URL;

#[derive(Parser)]
#[command(name = "tubesort")]
#[command(about = "Classify videos into categories from their titles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the web form
    Serve {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Address to listen on
        #[arg(long, env = "TUBESORT_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// Number of submitted links to remember
        #[arg(long, env = "TUBESORT_HISTORY_CAPACITY", default_value_t = 100)]
        history_capacity: usize,
    },
    /// Classify a single link and print the result
    Predict {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Video link, e.g. https://www.youtube.com/watch?v=<id>
        link: String,
    },
}

#[derive(Args)]
pub struct PipelineArgs {
    /// Directory holding model.onnx and tokenizer.json
    #[arg(long, env = "TUBESORT_MODEL_DIR", default_value = "models/title-classifier")]
    pub model_dir: PathBuf,

    /// YouTube Data API key
    #[arg(long, env = "TUBESORT_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Video metadata endpoint
    #[arg(long, env = "TUBESORT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Category names in model output order, comma separated
    #[arg(long, env = "TUBESORT_LABELS", default_value = "Education,Entertainment")]
    pub labels: String,

    /// Token window length the model was trained with
    #[arg(long, env = "TUBESORT_SEQUENCE_LENGTH", default_value_t = SEQUENCE_LEN)]
    pub sequence_length: usize,

    /// Metadata request timeout in seconds (no timeout when unset)
    #[arg(long, env = "TUBESORT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

/// Validated pipeline settings.
pub struct PipelineConfig {
    pub model_dir: PathBuf,
    pub api_key: String,
    pub api_url: String,
    pub labels: Labels,
    pub sequence_length: usize,
    pub request_timeout: Option<Duration>,
}

impl PipelineArgs {
    pub fn into_config(self) -> anyhow::Result<PipelineConfig> {
        anyhow::ensure!(!self.api_key.trim().is_empty(), "API key is empty");
        anyhow::ensure!(self.sequence_length > 0, "sequence length must be positive");
        let labels = Labels::parse(&self.labels)
            .map_err(|e| anyhow::anyhow!("invalid --labels {:?}: {e}", self.labels))?;

        Ok(PipelineConfig {
            model_dir: self.model_dir,
            api_key: self.api_key,
            api_url: self.api_url,
            labels,
            sequence_length: self.sequence_length,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        })
    }
}
