// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Machine lifecycle actions selected by `POST /{account}/machines/{id}?action=...`

use crate::error::StoreError;
use crate::filter::query_param;
use crate::store::CloudApiStore;

/// A lifecycle command and the query parameters it consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineAction {
    Stop,
    Start,
    Reboot,
    Resize { package: String },
    Rename { name: String },
    EnableFirewall,
    DisableFirewall,
}

impl MachineAction {
    /// Parse the `action` query parameter.
    ///
    /// Missing auxiliary parameters (`package`, `name`) become empty strings
    /// and are left for the store to reject. Returns `None` when `action` is
    /// absent or not one of the supported commands.
    pub fn from_query(raw_query: Option<&str>) -> Option<Self> {
        let param = |name| query_param(raw_query, name).unwrap_or_default();

        let action = match query_param(raw_query, "action")?.as_str() {
            "stop" => MachineAction::Stop,
            "start" => MachineAction::Start,
            "reboot" => MachineAction::Reboot,
            "resize" => MachineAction::Resize {
                package: param("package"),
            },
            "rename" => MachineAction::Rename {
                name: param("name"),
            },
            "enable_firewall" => MachineAction::EnableFirewall,
            "disable_firewall" => MachineAction::DisableFirewall,
            _ => return None,
        };
        Some(action)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MachineAction::Stop => "stop",
            MachineAction::Start => "start",
            MachineAction::Reboot => "reboot",
            MachineAction::Resize { .. } => "resize",
            MachineAction::Rename { .. } => "rename",
            MachineAction::EnableFirewall => "enable_firewall",
            MachineAction::DisableFirewall => "disable_firewall",
        }
    }

    /// Run the action against machine `id`.
    pub fn apply(&self, store: &dyn CloudApiStore, id: &str) -> Result<(), StoreError> {
        match self {
            MachineAction::Stop => store.stop_machine(id),
            MachineAction::Start => store.start_machine(id),
            MachineAction::Reboot => store.reboot_machine(id),
            MachineAction::Resize { package } => store.resize_machine(id, package),
            MachineAction::Rename { name } => store.rename_machine(id, name),
            MachineAction::EnableFirewall => store.enable_machine_firewall(id),
            MachineAction::DisableFirewall => store.disable_machine_firewall(id),
        }
    }
}
