use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use symptom_flow::EngineConfig;

#[derive(Parser, Debug)]
#[command(
    name = "symptom-cli",
    version,
    about = "Talk to the symptom-checker engine from a terminal"
)]
pub struct Cli {
    /// Base URL of the diagnosis engine
    #[arg(long, env = "SYMPTOM_ENGINE_URL", default_value = "http://127.0.0.1:5000")]
    pub engine_url: String,

    /// Give up on a request after this many seconds (waits forever when unset)
    #[arg(long, env = "SYMPTOM_ENGINE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Free-form conversation with follow-up questions
    Chat,
    /// Fixed question-by-question interview
    Interview {
        /// JSON question catalog; the bundled triage catalog is used when omitted
        #[arg(long, env = "SYMPTOM_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::new(self.engine_url.clone());
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}
