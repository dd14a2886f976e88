use clap::Parser;

use crate::config::{AppConfig, StoreBackend};

#[derive(Debug, Parser)]
#[command(name = "job-board-api")]
#[command(about = "Job board REST API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Address to bind (overrides SERVER_HOST)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides SERVER_PORT)")]
    pub port: Option<u16>,

    #[arg(long, value_parser = parse_store, help = "Persistence backend: postgres or memory")]
    pub store: Option<StoreBackend>,
}

fn parse_store(value: &str) -> Result<StoreBackend, String> {
    StoreBackend::parse(value).ok_or_else(|| format!("unknown store backend '{}', expected postgres or memory", value))
}

impl Cli {
    /// Layer command-line flags over the environment configuration
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(store) = self.store {
            config.store = store;
        }
        config
    }
}
