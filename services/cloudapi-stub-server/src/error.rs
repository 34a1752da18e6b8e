// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for the stub server

use http::Method;
use thiserror::Error;

use crate::response::{ErrorResponse, Reply};

/// Errors returned by store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The named resource does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// A resource with the same identity already exists
    #[error("{kind} {id} already exists")]
    Conflict { kind: &'static str, id: String },

    /// The request referenced something invalid
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A writer panicked while holding the store lock
    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors returned by resource handlers
///
/// `Response` carries a failure that renders itself (404, 405, ...). Every
/// other variant is rendered as the generic 500 envelope, with the variant's
/// text kept as the response diagnostic.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A failure with its own status and body
    #[error("{0}")]
    Response(ErrorResponse),

    /// Store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request body was not valid for the operation
    #[error("failed to decode request body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response value could not be encoded
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// Request body could not be read
    #[error("failed to read request body: {0}")]
    Body(String),

    /// No operation exists for this method and path
    #[error("unknown request method \"{method}\" for {path}")]
    Dispatch { method: Method, path: String },
}

impl From<ErrorResponse> for HandlerError {
    fn from(response: ErrorResponse) -> Self {
        HandlerError::Response(response)
    }
}

impl HandlerError {
    /// Convert into the reply written to the client.
    pub fn into_reply(self) -> Reply {
        match self {
            HandlerError::Response(response) => response.into_reply(),
            other => ErrorResponse::internal(other.to_string()).into_reply(),
        }
    }
}
