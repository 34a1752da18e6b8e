// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Response rendering
//!
//! Handlers produce a [`Reply`], the single shape every response takes
//! before it is written: status, body, content type, extra headers and an
//! optional diagnostic. The diagnostic never reaches the wire; it names the
//! underlying failure of a 500 so in-process callers can assert on it.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::error::HandlerError;

pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=UTF-8";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Body of every internal server error
pub const INTERNAL_ERROR_BODY: &str =
    r#"{"internalServerError":{"message":"Unknown Error","code":500}}"#;

/// A failure that renders itself
///
/// The associated constants are the canonical rejections. Each use of a
/// constant is a fresh value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: StatusCode,
    body: Cow<'static, str>,
    content_type: &'static str,
    error_text: Cow<'static, str>,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl ErrorResponse {
    pub const NOT_ALLOWED: ErrorResponse = ErrorResponse {
        status: StatusCode::METHOD_NOT_ALLOWED,
        body: Cow::Borrowed("Method is not allowed"),
        content_type: CONTENT_TYPE_TEXT,
        error_text: Cow::Borrowed("MethodNotAllowedError"),
        headers: Vec::new(),
    };

    pub const NOT_FOUND: ErrorResponse = ErrorResponse {
        status: StatusCode::NOT_FOUND,
        body: Cow::Borrowed("Resource Not Found"),
        content_type: CONTENT_TYPE_TEXT,
        error_text: Cow::Borrowed("NotFoundError"),
        headers: Vec::new(),
    };

    pub const BAD_REQUEST: ErrorResponse = ErrorResponse {
        status: StatusCode::BAD_REQUEST,
        body: Cow::Borrowed("Malformed request url"),
        content_type: CONTENT_TYPE_TEXT,
        error_text: Cow::Borrowed("BadRequestError"),
        headers: Vec::new(),
    };

    /// A 500 with the generic JSON body, remembering `error_text`.
    pub fn internal(error_text: impl Into<String>) -> Self {
        ErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Cow::Borrowed(INTERNAL_ERROR_BODY),
            content_type: CONTENT_TYPE_JSON,
            error_text: Cow::Owned(error_text.into()),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    pub fn into_reply(self) -> Reply {
        let content_type = (!self.content_type.is_empty()).then_some(self.content_type);
        let body = match self.body {
            Cow::Borrowed(s) => Bytes::from_static(s.as_bytes()),
            Cow::Owned(s) => Bytes::from(s),
        };
        Reply {
            status: self.status,
            body,
            content_type,
            headers: self.headers,
            diagnostic: Some(self.error_text.into_owned()),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_text)
    }
}

/// A response ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
    pub content_type: Option<&'static str>,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub diagnostic: Option<String>,
}

impl Reply {
    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self, HandlerError> {
        let body = serde_json::to_vec(value).map_err(HandlerError::Encode)?;
        Ok(Reply {
            status,
            body: Bytes::from(body),
            content_type: Some(CONTENT_TYPE_JSON),
            headers: Vec::new(),
            diagnostic: None,
        })
    }

    /// A reply with no body.
    pub fn empty(status: StatusCode) -> Self {
        Reply {
            status,
            body: Bytes::new(),
            content_type: None,
            headers: Vec::new(),
            diagnostic: None,
        }
    }

    /// Parse the body as JSON.
    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let length = self.body.len();
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        if let Some(content_type) = self.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        for (name, value) in self.headers {
            headers.insert(name, value);
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(length));

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_errors() {
        let not_found = ErrorResponse::NOT_FOUND.into_reply();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.as_ref(), b"Resource Not Found");
        assert_eq!(not_found.content_type, Some(CONTENT_TYPE_TEXT));
        assert_eq!(not_found.diagnostic.as_deref(), Some("NotFoundError"));

        let bad = ErrorResponse::BAD_REQUEST;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(bad.error_text(), "BadRequestError");
    }

    #[test]
    fn test_constants_are_not_shared() {
        let custom = ErrorResponse::NOT_ALLOWED
            .with_header(http::header::ALLOW, HeaderValue::from_static("GET"));
        assert_eq!(custom.into_reply().headers.len(), 1);
        assert!(ErrorResponse::NOT_ALLOWED.into_reply().headers.is_empty());
    }

    #[test]
    fn test_internal_error_body_is_fixed() {
        let reply = ErrorResponse::internal("disk on fire").into_reply();
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.diagnostic.as_deref(), Some("disk on fire"));
        let body = reply.json_body().unwrap();
        assert_eq!(body["internalServerError"]["code"], 500);
        assert_eq!(body["internalServerError"]["message"], "Unknown Error");
    }

    #[test]
    fn test_into_response_sets_length_and_type() {
        let reply = Reply::json(StatusCode::CREATED, &vec!["a", "b"]).unwrap();
        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
        assert_eq!(response.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
    }

    #[test]
    fn test_empty_reply_has_zero_length() {
        let response = Reply::empty(StatusCode::NO_CONTENT).into_response();
        assert_eq!(response.headers()[CONTENT_LENGTH], "0");
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }
}
