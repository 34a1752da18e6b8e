// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! `/{account}/packages`

use std::sync::Arc;

use http::{Method, StatusCode};

use super::{Request, ResourceHandler, ResourcePath, Target};
use crate::error::HandlerError;
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;

pub struct PackagesHandler {
    path: ResourcePath,
    store: Arc<dyn CloudApiStore>,
}

impl PackagesHandler {
    pub fn new(account: &str, store: Arc<dyn CloudApiStore>) -> Self {
        Self {
            path: ResourcePath::new(account, "packages"),
            store,
        }
    }
}

impl ResourceHandler for PackagesHandler {
    fn collection(&self) -> &str {
        self.path.collection()
    }

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError> {
        match (&request.method, self.path.target(&request.path)) {
            (&Method::GET, Target::Collection) => {
                let packages = self.store.list_packages(request.filters().as_ref())?;
                Reply::json(StatusCode::OK, &packages)
            }
            (&Method::GET, Target::Resource(name)) => {
                let package = self.store.get_package(name)?.unwrap_or_default();
                Reply::json(StatusCode::OK, &package)
            }
            (&Method::POST, _) | (&Method::PUT, _) | (&Method::DELETE, _) => {
                Err(ErrorResponse::NOT_ALLOWED.into())
            }
            _ => Err(request.unhandled()),
        }
    }
}
