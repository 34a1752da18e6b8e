// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! `/{account}/machines`
//!
//! Besides plain CRUD this family answers `HEAD` on the collection with the
//! machine count, lists per-machine firewall rules under `{id}/fwrules`, and
//! runs lifecycle actions on `POST {id}?action=...`.

use std::sync::Arc;

use http::{Method, StatusCode};

use super::actions::MachineAction;
use super::{Request, ResourceHandler, ResourcePath, Target};
use crate::error::HandlerError;
use crate::response::{ErrorResponse, Reply};
use crate::store::CloudApiStore;
use crate::types::CreateMachineRequest;

const FWRULES_SUFFIX: &str = "/fwrules";

pub struct MachinesHandler {
    path: ResourcePath,
    store: Arc<dyn CloudApiStore>,
}

impl MachinesHandler {
    pub fn new(account: &str, store: Arc<dyn CloudApiStore>) -> Self {
        Self {
            path: ResourcePath::new(account, "machines"),
            store,
        }
    }

    fn run_action(&self, id: &str, request: &Request) -> Result<Reply, HandlerError> {
        let Some(action) = MachineAction::from_query(request.query.as_deref()) else {
            return Err(ErrorResponse::NOT_ALLOWED.into());
        };
        tracing::debug!(machine = id, action = action.name(), "machine action");
        action.apply(self.store.as_ref(), id)?;
        Ok(Reply::empty(StatusCode::ACCEPTED))
    }
}

impl ResourceHandler for MachinesHandler {
    fn collection(&self) -> &str {
        self.path.collection()
    }

    fn handle(&self, request: &Request) -> Result<Reply, HandlerError> {
        match (&request.method, self.path.target(&request.path)) {
            (&Method::GET, Target::Collection) => {
                let machines = self.store.list_machines(request.filters().as_ref())?;
                Reply::json(StatusCode::OK, &machines)
            }
            (&Method::GET, Target::Resource(id)) => match id.strip_suffix(FWRULES_SUFFIX) {
                Some(id) => {
                    let rules = self.store.list_machine_firewall_rules(id)?;
                    Reply::json(StatusCode::OK, &rules)
                }
                None => {
                    let machine = self.store.get_machine(id)?.unwrap_or_default();
                    Reply::json(StatusCode::OK, &machine)
                }
            },
            (&Method::HEAD, Target::Collection) => {
                Reply::json(StatusCode::OK, &self.store.count_machines()?)
            }
            (&Method::HEAD, Target::Resource(_)) => Err(ErrorResponse::NOT_ALLOWED.into()),
            (&Method::POST, Target::Collection) => {
                let opts: CreateMachineRequest = request.decode_body()?;
                let machine = self.store.create_machine(opts)?;
                Reply::json(StatusCode::CREATED, &machine)
            }
            (&Method::POST, Target::Resource(id)) => self.run_action(id, request),
            (&Method::PUT, _) | (&Method::DELETE, Target::Collection) => {
                Err(ErrorResponse::NOT_ALLOWED.into())
            }
            (&Method::DELETE, Target::Resource(id)) => {
                self.store.delete_machine(id)?;
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
    use crate::store::MemoryStore;
    use crate::types::{MachineState, Metadata, Tags};
    use pretty_assertions::assert_eq;

    fn create(handler: &MachinesHandler, body: &'static str) -> serde_json::Value {
        let reply = call(
            handler,
            Request::new(Method::POST, "/test/machines").with_body(body),
        );
        assert_eq!(reply.status, StatusCode::CREATED, "{:?}", reply.diagnostic);
        reply.json_body().unwrap()
    }

    fn machine_id(body: &serde_json::Value) -> String {
        body["id"].as_str().unwrap().to_string()
    }

    fn setup() -> (Arc<MemoryStore>, MachinesHandler) {
        let store = store();
        let handler = MachinesHandler::new(ACCOUNT, store.clone());
        (store, handler)
    }

    #[test]
    fn test_create_machine_collects_tags_and_metadata() {
        let (store, handler) = setup();
        let body = create(
            &handler,
            r#"{"package":"g4-small","image":"img-1","tag.env":"prod","metadata.role":"db","networks":["net1","net2"]}"#,
        );

        let machine = store.get_machine(&machine_id(&body)).unwrap().unwrap();
        assert_eq!(machine.tags, Tags::from([("env".into(), "prod".into())]));
        assert_eq!(machine.metadata, Metadata::from([("role".into(), "db".into())]));
        assert_eq!(machine.networks, vec!["net1", "net2"]);
        assert_eq!(body["tags"]["env"], "prod");
    }

    #[test]
    fn test_create_machine_bad_attribute_is_internal_error() {
        let (_, handler) = setup();
        let reply = call(
            &handler,
            Request::new(Method::POST, "/test/machines").with_body(r#"{"metadata.n": true}"#),
        );
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply.diagnostic.unwrap().contains("metadata.n"));
    }

    #[test]
    fn test_head_counts_machines() {
        let (_, handler) = setup();
        create(&handler, r#"{"package":"g4-small","image":"img-1"}"#);
        create(&handler, r#"{"package":"g4-small","image":"img-1"}"#);

        let reply = call(&handler, Request::new(Method::HEAD, "/test/machines"));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body.as_ref(), b"2");

        let reply = call(&handler, Request::new(Method::HEAD, "/test/machines/abc"));
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_resize_action() {
        let (store, handler) = setup();
        let id = machine_id(&create(&handler, r#"{"package":"g4-small","image":"img-1"}"#));

        let reply = call(
            &handler,
            Request::new(Method::POST, format!("/test/machines/{}", id))
                .with_query("action=resize&package=g4"),
        );
        assert_eq!(reply.status, StatusCode::ACCEPTED);
        assert!(reply.body.is_empty());

        let machine = store.get_machine(&id).unwrap().unwrap();
        assert_eq!(machine.package, "g4");
        assert_eq!(machine.memory, 4096);
    }

    #[test]
    fn test_lifecycle_actions() {
        let (store, handler) = setup();
        let id = machine_id(&create(&handler, r#"{"package":"g4-small","image":"img-1"}"#));
        let path = format!("/test/machines/{}", id);
        let post = |query: &str| {
            call(
                &handler,
                Request::new(Method::POST, path.clone()).with_query(query),
            )
            .status
        };

        assert_eq!(post("action=stop"), StatusCode::ACCEPTED);
        assert_eq!(
            store.get_machine(&id).unwrap().unwrap().state,
            MachineState::Stopped
        );
        assert_eq!(post("action=start"), StatusCode::ACCEPTED);
        assert_eq!(post("action=reboot"), StatusCode::ACCEPTED);
        assert_eq!(post("action=rename&name=db02"), StatusCode::ACCEPTED);
        assert_eq!(post("action=enable_firewall"), StatusCode::ACCEPTED);

        let machine = store.get_machine(&id).unwrap().unwrap();
        assert_eq!(machine.name, "db02");
        assert!(machine.firewall_enabled);

        assert_eq!(post("action=disable_firewall"), StatusCode::ACCEPTED);
        assert!(!store.get_machine(&id).unwrap().unwrap().firewall_enabled);
    }

    #[test]
    fn test_firewall_flag_visible_through_get() {
        let (_, handler) = setup();
        let id = machine_id(&create(&handler, r#"{"package":"g4-small","image":"img-1"}"#));
        let path = format!("/test/machines/{}", id);

        let reply = call(
            &handler,
            Request::new(Method::POST, path.clone()).with_query("action=enable_firewall"),
        );
        assert_eq!(reply.status, StatusCode::ACCEPTED);

        let body = call(&handler, Request::new(Method::GET, path))
            .json_body()
            .unwrap();
        assert_eq!(body["firewall_enabled"], true);
        assert!(body.get("firewallEnabled").is_none());
    }

    #[test]
    fn test_unknown_action_not_allowed() {
        let (_, handler) = setup();
        let reply = call(
            &handler,
            Request::new(Method::POST, "/test/machines/abc").with_query("action=explode"),
        );
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);

        let reply = call(&handler, Request::new(Method::POST, "/test/machines/abc"));
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_action_store_error_is_internal() {
        let (_, handler) = setup();
        let reply = call(
            &handler,
            Request::new(Method::POST, "/test/machines/missing").with_query("action=stop"),
        );
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.diagnostic.as_deref(), Some("machine missing not found"));
    }

    #[test]
    fn test_machine_fwrules() {
        let (store, handler) = setup();
        let id = machine_id(&create(&handler, r#"{"package":"g4-small","image":"img-1"}"#));
        store
            .create_firewall_rule(&format!("FROM any TO vm {} ALLOW tcp PORT 22", id), true)
            .unwrap();

        let reply = call(
            &handler,
            Request::new(Method::GET, format!("/test/machines/{}/fwrules", id)),
        );
        let body = reply.json_body().unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let reply = call(
            &handler,
            Request::new(Method::GET, "/test/machines/other/fwrules"),
        );
        assert_eq!(reply.body.as_ref(), b"[]");

        let reply = call(&handler, Request::new(Method::GET, "/test/machines//fwrules"));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body.as_ref(), b"[]");
    }

    #[test]
    fn test_delete_machine() {
        let (store, handler) = setup();
        let id = machine_id(&create(&handler, r#"{"package":"g4-small","image":"img-1"}"#));

        let reply = call(
            &handler,
            Request::new(Method::DELETE, format!("/test/machines/{}", id)),
        );
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        assert_eq!(store.count_machines().unwrap(), 0);

        let reply = call(&handler, Request::new(Method::GET, format!("/test/machines/{}", id)));
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json_body().unwrap()["id"], "");
    }
}
