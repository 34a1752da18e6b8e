// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! `/{account}/keys`

use std::sync::Arc;

use http::{Method, StatusCode};

use super::{Request, ResourceHandler, ResourcePath, Target};
use crate::error::HandlerError;
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;
use crate::types::CreateKeyRequest;

pub struct KeysHandler {
    path: ResourcePath,
    store: Arc<dyn CloudApiStore>,
}

impl KeysHandler {
    pub fn new(account: &str, store: Arc<dyn CloudApiStore>) -> Self {
        Self {
            path: ResourcePath::new(account, "keys"),
            store,
        }
    }
}

impl ResourceHandler for KeysHandler {
    fn collection(&self) -> &str {
        self.path.collection()
    }

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError> {
        match (&request.method, self.path.target(&request.path)) {
            (&Method::GET, Target::Collection) => {
                Reply::json(StatusCode::OK, &self.store.list_keys()?)
            }
            (&Method::GET, Target::Resource(name)) => {
                let key = self.store.get_key(name)?.unwrap_or_default();
                Reply::json(StatusCode::OK, &key)
            }
            (&Method::POST, Target::Collection) => {
                let opts: CreateKeyRequest = request.decode_body()?;
                let key = self.store.create_key(&opts.name, &opts.key)?;
                Reply::json(StatusCode::CREATED, &key)
            }
            (&Method::POST, Target::Resource(_))
            | (&Method::PUT, _)
            | (&Method::DELETE, Target::Collection) => Err(ErrorResponse::NOT_ALLOWED.into()),
            (&Method::DELETE, Target::Resource(name)) => {
                self.store.delete_key(name)?;
                Ok(Reply::empty(StatusCode::NO_CONTENT))
            }
            _ => Err(request.unhandled()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{ACCOUNT, call, store};
    use serde_json::json;

    fn handler() -> KeysHandler {
        KeysHandler::new(ACCOUNT, store())
    }

    #[test]
    fn test_create_and_get_key() {
        let handler = handler();
        let reply = call(
            &handler,
            Request::new(Method::POST, "/test/keys")
                .with_body(r#"{"name":"k1","key":"ssh-rsa AAAAB3NzaC1yc2E= me"}"#),
        );
        assert_eq!(reply.status, StatusCode::CREATED);
        let body = reply.json_body().unwrap();
        assert_eq!(body["name"], "k1");
        assert_eq!(body["key"], "ssh-rsa AAAAB3NzaC1yc2E= me");

        let reply = call(&handler, Request::new(Method::GET, "/test/keys/k1"));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json_body().unwrap()["fingerprint"], body["fingerprint"]);

        let reply = call(&handler, Request::new(Method::GET, "/test/keys"));
        assert_eq!(reply.json_body().unwrap().as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_missing_key_is_zero_value() {
        let reply = call(&handler(), Request::new(Method::GET, "/test/keys/nope"));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.json_body().unwrap(),
            json!({"name": "", "key": "", "fingerprint": ""})
        );
    }

    #[test]
    fn test_create_with_empty_body_reaches_store() {
        let reply = call(&handler(), Request::new(Method::POST, "/test/keys"));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.diagnostic.as_deref(),
            Some("invalid argument: key name is required")
        );
    }

    #[test]
    fn test_delete_key() {
        let handler = handler();
        call(
            &handler,
            Request::new(Method::POST, "/test/keys").with_body(r#"{"name":"k1","key":"x"}"#),
        );

        let reply = call(&handler, Request::new(Method::DELETE, "/test/keys/k1"));
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        assert!(reply.body.is_empty());

        let reply = call(&handler, Request::new(Method::DELETE, "/test/keys/k1"));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejected_methods() {
        let handler = handler();
        for request in [
            Request::new(Method::POST, "/test/keys/k1"),
            Request::new(Method::PUT, "/test/keys"),
            Request::new(Method::DELETE, "/test/keys"),
        ] {
            assert_eq!(call(&handler, request).status, StatusCode::METHOD_NOT_ALLOWED);
        }

        let reply = call(&handler, Request::new(Method::HEAD, "/test/keys"));
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.diagnostic.as_deref(),
            Some("unknown request method \"HEAD\" for /test/keys")
        );
    }
}
