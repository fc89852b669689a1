//! Zowe gateway
//!
//! Serves the sample REST API behind token and platform authentication.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zowe_auth_platform::UnavailableNative;
use zowe_gateway::GatewayConfig;

/// Zowe REST API gateway
#[derive(Parser, Debug)]
#[command(name = "zowe-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "ZOWE_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// Active profile; repeat for several (overrides auth.profiles)
    #[arg(short, long = "profile", env = "ZOWE_GATEWAY_PROFILES", value_delimiter = ',')]
    profiles: Vec<String>,

    /// Token signing secret (overrides auth.token.secret_key)
    #[arg(long, env = "ZOWE_GATEWAY_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn apply(&self, config: &mut GatewayConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if !self.profiles.is_empty() {
            config.auth.profiles = self.profiles.clone();
        }
        if let Some(secret) = &self.secret_key {
            config.auth.token.secret_key = secret.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = GatewayConfig::load(args.config.as_deref())
        .context("failed to load gateway configuration")?;
    args.apply(&mut config);

    if args.print_config {
        let mut shown = config.clone();
        if !shown.auth.token.secret_key.is_empty() {
            shown.auth.token.secret_key = "********".to_string();
        }
        print!("{}", shown.to_toml_string()?);
        return Ok(());
    }

    tracing::info!(profiles = ?config.auth.profiles, bind = %config.server.bind, "Starting gateway");
    zowe_gateway::serve(config, &UnavailableNative)
        .await
        .context("gateway stopped with an error")
}
