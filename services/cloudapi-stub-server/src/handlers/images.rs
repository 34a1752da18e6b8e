// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! `/{account}/images`
//!
//! Images are read-only. Creating an image from a machine is not supported
//! and answers 404.

use std::sync::Arc;

use http::{Method, StatusCode};

use super::{Request, ResourceHandler, ResourcePath, Target};
use crate::error::HandlerError;
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;

pub struct ImagesHandler {
    path: ResourcePath,
    store: Arc<dyn CloudApiStore>,
}

impl ImagesHandler {
    pub fn new(account: &str, store: Arc<dyn CloudApiStore>) -> Self {
        Self {
            path: ResourcePath::new(account, "images"),
            store,
        }
    }
}

impl ResourceHandler for ImagesHandler {
    fn collection(&self) -> &str {
        self.path.collection()
    }

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError> {
        match (&request.method, self.path.target(&request.path)) {
            (&Method::GET, Target::Collection) => {
                let images = self.store.list_images(request.filters().as_ref())?;
                Reply::json(StatusCode::OK, &images)
            }
            (&Method::GET, Target::Resource(id)) => {
                let image = self.store.get_image(id)?.unwrap_or_default();
                Reply::json(StatusCode::OK, &image)
            }
            (&Method::POST, Target::Collection) => Err(ErrorResponse::NOT_FOUND.into()),
            (&Method::POST, Target::Resource(_)) | (&Method::PUT, _) | (&Method::DELETE, _) => {
                Err(ErrorResponse::NOT_ALLOWED.into())
            }
            _ => Err(request.unhandled()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{ACCOUNT, call, store};

    #[test]
    fn test_list_images_with_filters() {
        let handler = ImagesHandler::new(ACCOUNT, store());

        let reply = call(&handler, Request::new(Method::GET, "/test/images"));
        assert_eq!(reply.json_body().unwrap().as_array().map(Vec::len), Some(1));

        let reply = call(
            &handler,
            Request::new(Method::GET, "/test/images").with_query("os=linux"),
        );
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body.as_ref(), b"[]");
    }

    #[test]
    fn test_get_image() {
        let handler = ImagesHandler::new(ACCOUNT, store());
        let reply = call(&handler, Request::new(Method::GET, "/test/images/img-1"));
        assert_eq!(reply.json_body().unwrap()["name"], "base64");

        let reply = call(&handler, Request::new(Method::GET, "/test/images/missing"));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json_body().unwrap()["id"], "");
    }

    #[test]
    fn test_create_image_not_found() {
        let handler = ImagesHandler::new(ACCOUNT, store());
        let reply = call(&handler, Request::new(Method::POST, "/test/images"));
        assert_eq!(reply.status, StatusCode::NOT_FOUND);

        let reply = call(&handler, Request::new(Method::DELETE, "/test/images/img-1"));
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
