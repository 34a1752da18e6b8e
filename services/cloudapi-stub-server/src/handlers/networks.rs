// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! `/{account}/networks`

use std::sync::Arc;

use http::{Method, StatusCode};

use super::{Request, ResourceHandler, ResourcePath, Target};
use crate::error::HandlerError;
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;

pub struct NetworksHandler {
    path: ResourcePath,
    store: Arc<dyn CloudApiStore>,
}

impl NetworksHandler {
    pub fn new(account: &str, store: Arc<dyn CloudApiStore>) -> Self {
        Self {
            path: ResourcePath::new(account, "networks"),
            store,
        }
    }
}

impl ResourceHandler for NetworksHandler {
    fn collection(&self) -> &str {
        self.path.collection()
    }

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError> {
        match (&request.method, self.path.target(&request.path)) {
            (&Method::GET, Target::Collection) => {
                Reply::json(StatusCode::OK, &self.store.list_networks()?)
            }
            (&Method::GET, Target::Resource(id)) => {
                let network = self.store.get_network(id)?.unwrap_or_default();
                Reply::json(StatusCode::OK, &network)
            }
            (&Method::POST, _) | (&Method::PUT, _) | (&Method::DELETE, _) => {
                Err(ErrorResponse::NOT_ALLOWED.into())
            }
            _ => Err(request.unhandled()),
        }
    }
}
