// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! HTTP/1.1 front end
//!
//! Each accepted connection is served on its own task. A request's body is
//! read in full before it reaches the [`Router`], and every outcome,
//! including a failed body read, is answered through [`render`].

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::StubConfig;
use crate::error::HandlerError;
use crate::handlers::Request;
use crate::response::ErrorResponse;
use crate::router::{Router, cloudapi_router, render};
use crate::store::CloudApiStore;

/// Accept connections on `listener` forever, answering through `router`.
pub async fn serve(listener: TcpListener, router: Arc<Router>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("accept error: {e}");
                continue;
            }
        };

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let router = Arc::clone(&router);
                async move { handle(&router, req).await }
            });
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                tracing::debug!(%peer, "connection error: {e}");
            }
        });
    }
}

async fn handle(
    router: &Router,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let path = match decode_path(parts.uri.path()) {
        Ok(path) => path,
        Err(e) => return Ok(render(Err(e)).into_response()),
    };
    let reply = match body.collect().await {
        Ok(collected) => {
            let request = Request {
                method: parts.method,
                path,
                query: parts.uri.query().map(str::to_string),
                body: collected.to_bytes(),
            };
            router.dispatch(&request)
        }
        Err(e) => render(Err(HandlerError::Body(e.to_string()))),
    };
    Ok(reply.into_response())
}

/// Percent-decode a request path so resource ids match their stored form.
///
/// `+` is kept literally. An escape that decodes to invalid UTF-8 is a
/// malformed url.
fn decode_path(raw: &str) -> Result<String, HandlerError> {
    urlencoding::decode(raw)
        .map(|path| path.into_owned())
        .map_err(|_| ErrorResponse::BAD_REQUEST.into())
}

/// A running server bound to a local address
///
/// The server stops when this value is dropped.
pub struct StubServer {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Bind `config.bind_address` and start serving `store` for
    /// `config.account`.
    ///
    /// Binding port 0 picks a free port; see [`StubServer::local_addr`].
    pub async fn start(config: &StubConfig, store: Arc<dyn CloudApiStore>) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_address)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind_address))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read listener address")?;

        let router = Arc::new(cloudapi_router(&config.account, store));
        tracing::info!(addr = %local_addr, account = %config.account, "CloudAPI stub listening");

        let task = tokio::spawn(serve(listener, router));
        Ok(Self { local_addr, task })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `http://host:port` of the running server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
