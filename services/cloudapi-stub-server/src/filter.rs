// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Query string handling for list filters and action parameters

use std::collections::BTreeMap;

/// List filters parsed from a raw query string
pub type Filters = BTreeMap<String, String>;

/// Parse `key=value` pairs joined by `&` into a filter set.
///
/// Values are taken verbatim (no URL decoding). An absent or empty query
/// string yields `None`, which callers treat as "no filtering" as opposed
/// to an empty filter set. A pair without `=` maps to an empty value and
/// the last occurrence of a repeated key wins.
pub fn parse_filters(raw_query: Option<&str>) -> Option<Filters> {
    let raw_query = raw_query.filter(|q| !q.is_empty())?;

    let filters = raw_query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect();

    Some(filters)
}

/// Look up the first value of a URL-encoded query parameter.
pub fn query_param(raw_query: Option<&str>, name: &str) -> Option<String> {
    url::form_urlencoded::parse(raw_query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
