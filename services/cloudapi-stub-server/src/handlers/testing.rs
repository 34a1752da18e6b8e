// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Shared setup for handler unit tests

use std::sync::Arc;

use crate::response::Reply;
use crate::store::MemoryStore;
use crate::types::{Image, Network, Package};

use super::{Request, ResourceHandler};

pub const ACCOUNT: &str = "test";

/// A store with one image, two packages and two networks
pub fn store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new()
            .with_image(Image {
                id: "img-1".into(),
                name: "base64".into(),
                os: "smartos".into(),
                image_type: "zone-dataset".into(),
                ..Default::default()
            })
            .with_package(Package {
                id: "pkg-1".into(),
                name: "g4-small".into(),
                memory: 1024,
                disk: 25600,
                ..Default::default()
            })
            .with_package(Package {
                id: "pkg-2".into(),
                name: "g4".into(),
                memory: 4096,
                disk: 51200,
                ..Default::default()
            })
            .with_network(Network {
                id: "net1".into(),
                name: "public".into(),
                public: true,
                ..Default::default()
            })
            .with_network(Network {
                id: "net2".into(),
                name: "private".into(),
                ..Default::default()
            }),
    )
}

/// Run a request through `handler`, rendering errors the way the router does.
pub fn call(handler: &dyn ResourceHandler, request: Request) -> Reply {
    match handler.handle(&request) {
        Ok(reply) => reply,
        Err(err) => err.into_reply(),
    }
}
