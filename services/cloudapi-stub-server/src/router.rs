// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Path routing
//!
//! Routes are registered by path pattern. A pattern ending in `/` names a
//! subtree and matches every path below it; any other pattern matches only
//! itself. Lookup picks the exact pattern when one exists, otherwise the
//! longest subtree pattern that prefixes the path.
//!
//! The routing table for an account is:
//!
//! | Pattern               | Route                     |
//! |-----------------------|---------------------------|
//! | `/`                   | 404 Resource Not Found    |
//! | `/{account}/`         | 400 Malformed request url |
//! | `/{account}/{family}` | family handler            |
//! | `/{account}/{family}/`| family handler            |
//!
//! Family handlers reject any path ending in `/` with a 404, so
//! `/{account}/keys/` is not the same resource as `/{account}/keys`.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::StatusCode;

use crate::error::HandlerError;
use crate::handlers::{
    FirewallRulesHandler, ImagesHandler, KeysHandler, MachinesHandler, NetworksHandler,
    PackagesHandler, Request, ResourceHandler,
};
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;

/// Placeholder for the account name in route patterns
pub const ACCOUNT_PLACEHOLDER: &str = "{account}";

enum Route {
    /// Fixed rejection, served as-is
    Reject(ErrorResponse),
    Resource(Arc<dyn ResourceHandler>),
}

/// Builds a [`Router`] for one account
pub struct RouterBuilder {
    account: String,
    routes: BTreeMap<String, Route>,
}

impl RouterBuilder {
    /// Start a table holding the root and account-level rejections.
    pub fn new(account: impl Into<String>) -> Self {
        let mut builder = Self {
            account: account.into(),
            routes: BTreeMap::new(),
        };
        builder.insert("/", Route::Reject(ErrorResponse::NOT_FOUND));
        builder.insert(
            &format!("/{}/", ACCOUNT_PLACEHOLDER),
            Route::Reject(ErrorResponse::BAD_REQUEST),
        );
        builder
    }

    /// Register `handler` for its collection path and the subtree below it.
    pub fn resource(mut self, handler: Arc<dyn ResourceHandler>) -> Self {
        let collection = handler.collection().to_string();
        if !collection.ends_with('/') {
            self.insert(&format!("{}/", collection), Route::Resource(handler.clone()));
        }
        self.insert(&collection, Route::Resource(handler));
        self
    }

    pub fn build(self) -> Router {
        Router {
            routes: self.routes,
        }
    }

    fn insert(&mut self, pattern: &str, route: Route) {
        let pattern = pattern.replacen(ACCOUNT_PLACEHOLDER, &self.account, 1);
        self.routes.insert(pattern, route);
    }
}

/// Build the router serving every resource family for `account`.
pub fn cloudapi_router(account: &str, store: Arc<dyn CloudApiStore>) -> Router {
    RouterBuilder::new(account)
        .resource(Arc::new(KeysHandler::new(account, store.clone())))
        .resource(Arc::new(ImagesHandler::new(account, store.clone())))
        .resource(Arc::new(PackagesHandler::new(account, store.clone())))
        .resource(Arc::new(MachinesHandler::new(account, store.clone())))
        .resource(Arc::new(FirewallRulesHandler::new(account, store.clone())))
        .resource(Arc::new(NetworksHandler::new(account, store)))
        .build()
}

/// Immutable routing table, shared by every connection
pub struct Router {
    routes: BTreeMap<String, Route>,
}

impl Router {
    /// Registered patterns, in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    fn lookup(&self, path: &str) -> Option<&Route> {
        if let Some(route) = self.routes.get(path) {
            return Some(route);
        }
        self.routes
            .iter()
            .filter(|(pattern, _)| pattern.ends_with('/') && path.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, route)| route)
    }

    /// Route `request` and render the outcome.
    pub fn dispatch(&self, request: &Request) -> Reply {
        let outcome: Result<Reply, HandlerError> = match self.lookup(&request.path) {
            Some(Route::Reject(response)) => Err(response.clone().into()),
            Some(Route::Resource(_)) if request.path.ends_with('/') && request.path != "/" => {
                Err(ErrorResponse::NOT_FOUND.into())
            }
            Some(Route::Resource(handler)) => handler.handle(request),
            None => Err(ErrorResponse::NOT_FOUND.into()),
        };
        let reply = render(outcome);
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = reply.status.as_u16(),
            "handled request"
        );
        reply
    }
}

/// Turn a handler outcome into the reply written to the client.
pub fn render(outcome: Result<Reply, HandlerError>) -> Reply {
    match outcome {
        Ok(reply) => reply,
        Err(err) => {
            let reply = err.into_reply();
            if reply.status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::warn!(
                    error = reply.diagnostic.as_deref().unwrap_or_default(),
                    "request failed"
                );
            }
            reply
        }
    }
}
