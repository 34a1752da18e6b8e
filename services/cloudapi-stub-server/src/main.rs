// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Standalone stub CloudAPI server for testing and development
//!
//! Run with:
//! ```bash
//! cargo run -p cloudapi-stub-server -- --account test
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudapi_stub_server::{Fixtures, MemoryStore, StubConfig, StubServer};

/// Command-line overrides; anything unset falls back to the environment
#[derive(Parser, Debug)]
#[command(name = "cloudapi-stub-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Account name served under /{account}/
    #[arg(long)]
    account: Option<String>,

    /// JSON file with images, packages and networks
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cloudapi_stub_server=info".to_string()),
        ))
        .init();

    let args = Args::parse();
    let mut config = StubConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(account) = args.account {
        config.account = account;
    }
    if let Some(fixtures) = args.fixtures {
        config.fixtures = Some(fixtures);
    }

    let fixtures_path = config.fixtures.clone().unwrap_or_else(Fixtures::default_path);
    let fixtures = Fixtures::from_file(&fixtures_path)?;
    let store = Arc::new(MemoryStore::from_fixtures(fixtures));

    let server = StubServer::start(&config, store).await?;

    tracing::info!("Stub CloudAPI server listening on {}", server.base_url());
    tracing::info!("Available endpoints:");
    for family in ["keys", "images", "packages", "machines", "fwrules", "networks"] {
        tracing::info!("  /{}/{}", config.account, family);
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}
