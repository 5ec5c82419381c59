use clap::Parser;
use humantime_serde::re::humantime;

use std::{path::PathBuf, time::Duration};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "notes-client", version, about = "Browse and edit notes on a REST notes service")]
pub struct Args {
    /// Base url of the notes service, e.g. http://localhost:8000
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Request timeout, e.g. 15s or 500ms
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// YAML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the log file
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    /// Command line values take precedence over file and environment
    pub fn apply(&self, config: &mut Config) {
        config.set_api_base(self.api_base.clone());
        if let Some(timeout) = self.timeout {
            config.request_timeout = timeout;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(value)
}
