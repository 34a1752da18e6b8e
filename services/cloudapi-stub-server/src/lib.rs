// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Stub CloudAPI server for testing
//!
//! This crate provides an in-process HTTP double of the CloudAPI REST
//! surface for one account. It can be used for:
//!
//! - Integration testing of CloudAPI clients without a real datacenter
//! - Local development and demos
//!
//! Six resource families are served under `/{account}/`: keys, images,
//! packages, machines, fwrules and networks. Images, packages and networks
//! come from fixtures loaded at startup; keys, machines and firewall rules
//! are created through the API and live in memory.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use cloudapi_stub_server::{Fixtures, MemoryStore, StubConfig, StubServer};
//!
//! let fixtures = Fixtures::from_file(&Fixtures::default_path())?;
//! let config = StubConfig {
//!     bind_address: "127.0.0.1:0".parse()?,
//!     ..Default::default()
//! };
//! let server = StubServer::start(&config, Arc::new(MemoryStore::from_fixtures(fixtures))).await?;
//! println!("serving {}/test/machines", server.base_url());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod handlers;
pub mod response;
pub mod router;
pub mod server;
pub mod store;
pub mod types;

pub use config::StubConfig;
pub use error::{HandlerError, StoreError};
pub use fixtures::Fixtures;
pub use response::{ErrorResponse, Reply};
pub use router::{Router, RouterBuilder, cloudapi_router};
pub use server::{StubServer, serve};
pub use store::{CloudApiStore, MemoryStore};
