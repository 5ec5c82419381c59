use anyhow::{Context, Result};
use clap::Parser;

use std::sync::Arc;

use notes_client::{
    api::NotesApi,
    cli::Args,
    config, logging,
    shell::Shell,
    ui::ApiBadge,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config setup
    let (mut cfg, notices) =
        config::load_config(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut cfg);

    // Log setup
    let _guard = logging::init(&cfg.log_dir()).context("initializing logging")?;
    for notice in &notices {
        notice.log();
    }
    tracing::info!("Successfully loaded notes client config");
    tracing::info!(
        "Using API base {} with a {:?} request timeout",
        cfg.api_base(),
        cfg.request_timeout
    );

    // Client creation
    let api = NotesApi::new(cfg.api_base(), cfg.request_timeout)
        .with_context(|| format!("creating client for {}", cfg.api_base()))?;

    let badge = ApiBadge {
        base: api.base().to_string(),
        custom: cfg.has_custom_base(),
    };

    let mut shell = Shell::new(Arc::new(api), badge);
    shell.run()
}
