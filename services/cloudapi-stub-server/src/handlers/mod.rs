// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Per-family request handlers
//!
//! Each handler owns one resource family under `/{account}/{family}` and
//! maps (method, path suffix) onto a store operation:
//!
//! - [`keys`] - SSH keys (list, get, create, delete)
//! - [`images`] - images (list with filters, get)
//! - [`packages`] - packages (list with filters, get)
//! - [`machines`] - machines, including lifecycle actions ([`actions`])
//! - [`fwrules`] - firewall rules (CRUD plus enable/disable)
//! - [`networks`] - networks (list, get)

pub mod actions;
pub mod fwrules;
pub mod images;
pub mod keys;
pub mod machines;
pub mod networks;
pub mod packages;

#[cfg(test)]
pub(crate) mod testing;

use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;

use crate::error::HandlerError;
use crate::filter::{Filters, parse_filters};
use crate::response::Reply;

pub use fwrules::FirewallRulesHandler;
pub use images::ImagesHandler;
pub use keys::KeysHandler;
pub use machines::MachinesHandler;
pub use networks::NetworksHandler;
pub use packages::PackagesHandler;

/// A request as seen by the handlers, with the body already read
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// List filters from the raw query string
    pub fn filters(&self) -> Option<Filters> {
        parse_filters(self.query.as_deref())
    }

    /// Decode the JSON body, treating an empty body as all defaults.
    pub fn decode_body<T: DeserializeOwned + Default>(&self) -> Result<T, HandlerError> {
        if self.body.is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The error for a method/path combination no handler arm covers.
    pub fn unhandled(&self) -> HandlerError {
        HandlerError::Dispatch {
            method: self.method.clone(),
            path: self.path.clone(),
        }
    }
}

/// Handler for one resource family
pub trait ResourceHandler: Send + Sync {
    /// Collection path this handler is registered under, e.g. `/acct/keys`
    fn collection(&self) -> &str;

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError>;
}

/// What a request path addresses within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Collection,
    /// Everything after `/{account}/{family}/`
    Resource(&'a str),
}

/// Resolved path prefix for one family
#[derive(Debug, Clone)]
pub struct ResourcePath {
    collection: String,
    prefix: String,
}

impl ResourcePath {
    pub fn new(account: &str, family: &str) -> Self {
        let collection = format!("/{}/{}", account, family);
        let prefix = format!("{}/", collection);
        Self { collection, prefix }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn target<'a>(&self, path: &'a str) -> Target<'a> {
        if path == self.collection {
            Target::Collection
        } else {
            Target::Resource(path.strip_prefix(self.prefix.as_str()).unwrap_or(path))
        }
    }
}
