// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! `/{account}/fwrules`
//!
//! `POST {id}/enable` and `POST {id}/disable` toggle a rule; any other
//! `POST {id}` replaces the rule text and enabled flag from the body.

use std::sync::Arc;

use http::{Method, StatusCode};

use super::{Request, ResourceHandler, ResourcePath, Target};
use crate::error::HandlerError;
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;
use crate::types::FirewallRuleRequest;

pub struct FirewallRulesHandler {
    path: ResourcePath,
    store: Arc<dyn CloudApiStore>,
}

impl FirewallRulesHandler {
    pub fn new(account: &str, store: Arc<dyn CloudApiStore>) -> Self {
        Self {
            path: ResourcePath::new(account, "fwrules"),
            store,
        }
    }

    fn post_rule(&self, target: &str, request: &Request) -> Result<Reply, HandlerError> {
        let rule = if let Some(id) = target.strip_suffix("/enable") {
            self.store.enable_firewall_rule(id)?
        } else if let Some(id) = target.strip_suffix("/disable") {
            self.store.disable_firewall_rule(id)?
        } else {
            let opts: FirewallRuleRequest = request.decode_body()?;
            self.store
                .update_firewall_rule(target, &opts.rule, opts.enabled)?
        };
        Reply::json(StatusCode::OK, &rule)
    }
}

impl ResourceHandler for FirewallRulesHandler {
    fn collection(&self) -> &str {
        self.path.collection()
    }

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError> {
        match (&request.method, self.path.target(&request.path)) {
            (&Method::GET, Target::Collection) => {
                Reply::json(StatusCode::OK, &self.store.list_firewall_rules()?)
            }
            (&Method::GET, Target::Resource(id)) => {
                let rule = self.store.get_firewall_rule(id)?.unwrap_or_default();
                Reply::json(StatusCode::OK, &rule)
            }
            (&Method::POST, Target::Collection) => {
                let opts: FirewallRuleRequest = request.decode_body()?;
                let rule = self.store.create_firewall_rule(&opts.rule, opts.enabled)?;
                Reply::json(StatusCode::CREATED, &rule)
            }
            (&Method::POST, Target::Resource(target)) => self.post_rule(target, request),
            (&Method::PUT, _) | (&Method::DELETE, Target::Collection) => {
                Err(ErrorResponse::NOT_ALLOWED.into())
            }
            (&Method::DELETE, Target::Resource(id)) => {
                self.store.delete_firewall_rule(id)?;
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

    fn create_rule(handler: &FirewallRulesHandler) -> String {
        let reply = call(
            handler,
            Request::new(Method::POST, "/test/fwrules")
                .with_body(r#"{"rule":"FROM any TO all vms ALLOW tcp PORT 22"}"#),
        );
        assert_eq!(reply.status, StatusCode::CREATED);
        let body = reply.json_body().unwrap();
        assert_eq!(body["enabled"], false);
        body["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_enable_and_disable() {
        let handler = FirewallRulesHandler::new(ACCOUNT, store());
        let id = create_rule(&handler);

        let reply = call(
            &handler,
            Request::new(Method::POST, format!("/test/fwrules/{}/enable", id)),
        );
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json_body().unwrap()["enabled"], true);

        let reply = call(
            &handler,
            Request::new(Method::POST, format!("/test/fwrules/{}/disable", id)),
        );
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json_body().unwrap()["enabled"], false);
    }

    #[test]
    fn test_update_rule() {
        let handler = FirewallRulesHandler::new(ACCOUNT, store());
        let id = create_rule(&handler);

        let reply = call(
            &handler,
            Request::new(Method::POST, format!("/test/fwrules/{}", id))
                .with_body(r#"{"rule":"FROM any TO all vms BLOCK udp PORT 53","enabled":true}"#),
        );
        assert_eq!(reply.status, StatusCode::OK);

        let reply = call(&handler, Request::new(Method::GET, format!("/test/fwrules/{}", id)));
        let body = reply.json_body().unwrap();
        assert_eq!(body["rule"], "FROM any TO all vms BLOCK udp PORT 53");
        assert_eq!(body["enabled"], true);
    }

    #[test]
    fn test_update_missing_rule_is_internal() {
        let handler = FirewallRulesHandler::new(ACCOUNT, store());
        let reply = call(
            &handler,
            Request::new(Method::POST, "/test/fwrules/missing/enable"),
        );
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.diagnostic.as_deref(),
            Some("firewall rule missing not found")
        );
    }

    #[test]
    fn test_delete_rule() {
        let handler = FirewallRulesHandler::new(ACCOUNT, store());
        let id = create_rule(&handler);

        let reply = call(
            &handler,
            Request::new(Method::DELETE, format!("/test/fwrules/{}", id)),
        );
        assert_eq!(reply.status, StatusCode::NO_CONTENT);

        let reply = call(&handler, Request::new(Method::GET, "/test/fwrules"));
        assert_eq!(reply.body.as_ref(), b"[]");
    }
}
