// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Stub server configuration

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9091));

/// Default account name served under `/{account}/...`
pub const DEFAULT_ACCOUNT: &str = "test";

/// Stub server configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubConfig {
    /// Address to listen on
    pub bind_address: SocketAddr,
    /// Account the routes are registered for
    pub account: String,
    /// Fixture file to seed the catalog from; `None` uses the bundled one
    pub fixtures: Option<PathBuf>,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            account: DEFAULT_ACCOUNT.to_string(),
            fixtures: None,
        }
    }
}

impl StubConfig {
    /// Load configuration from environment variables
    ///
    /// - `BIND_ADDRESS` (default `127.0.0.1:9091`)
    /// - `CLOUDAPI_ACCOUNT` (default `test`)
    /// - `FIXTURES` (default: bundled fixtures)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .context("BIND_ADDRESS must be a socket address")?,
            None => DEFAULT_BIND_ADDRESS,
        };

        let account = lookup("CLOUDAPI_ACCOUNT")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

        let fixtures = lookup("FIXTURES").map(PathBuf::from);

        Ok(Self {
            bind_address,
            account,
            fixtures,
        })
    }
}
