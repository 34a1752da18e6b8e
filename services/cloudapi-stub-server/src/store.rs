// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Resource storage behind the stub
//!
//! Handlers only talk to [`CloudApiStore`]. [`MemoryStore`] is the
//! implementation the server runs with; tests may substitute their own.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use base64::Engine;
use chrono::{SecondsFormat, Utc};
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::Filters;
use crate::fixtures::Fixtures;
use crate::types::{
    CreateMachineRequest, FirewallRule, Image, Key, Machine, MachineState, Network, Package,
};

/// Operations the stub exposes over HTTP
///
/// Single-resource getters return `Ok(None)` when nothing matches; every
/// other miss is an error.
pub trait CloudApiStore: Send + Sync {
    fn list_keys(&self) -> Result<Vec<Key>, StoreError>;
    fn get_key(&self, name: &str) -> Result<Option<Key>, StoreError>;
    fn create_key(&self, name: &str, key: &str) -> Result<Key, StoreError>;
    fn delete_key(&self, name: &str) -> Result<(), StoreError>;

    fn list_images(&self, filters: Option<&Filters>) -> Result<Vec<Image>, StoreError>;
    fn get_image(&self, id: &str) -> Result<Option<Image>, StoreError>;

    fn list_packages(&self, filters: Option<&Filters>) -> Result<Vec<Package>, StoreError>;
    fn get_package(&self, name: &str) -> Result<Option<Package>, StoreError>;

    fn list_machines(&self, filters: Option<&Filters>) -> Result<Vec<Machine>, StoreError>;
    fn count_machines(&self) -> Result<usize, StoreError>;
    fn get_machine(&self, id: &str) -> Result<Option<Machine>, StoreError>;
    fn create_machine(&self, request: CreateMachineRequest) -> Result<Machine, StoreError>;
    fn delete_machine(&self, id: &str) -> Result<(), StoreError>;
    fn stop_machine(&self, id: &str) -> Result<(), StoreError>;
    fn start_machine(&self, id: &str) -> Result<(), StoreError>;
    fn reboot_machine(&self, id: &str) -> Result<(), StoreError>;
    fn resize_machine(&self, id: &str, package: &str) -> Result<(), StoreError>;
    fn rename_machine(&self, id: &str, name: &str) -> Result<(), StoreError>;
    fn enable_machine_firewall(&self, id: &str) -> Result<(), StoreError>;
    fn disable_machine_firewall(&self, id: &str) -> Result<(), StoreError>;
    fn list_machine_firewall_rules(&self, id: &str) -> Result<Vec<FirewallRule>, StoreError>;

    fn list_firewall_rules(&self) -> Result<Vec<FirewallRule>, StoreError>;
    fn get_firewall_rule(&self, id: &str) -> Result<Option<FirewallRule>, StoreError>;
    fn create_firewall_rule(&self, rule: &str, enabled: bool) -> Result<FirewallRule, StoreError>;
    fn update_firewall_rule(
        &self,
        id: &str,
        rule: &str,
        enabled: bool,
    ) -> Result<FirewallRule, StoreError>;
    fn enable_firewall_rule(&self, id: &str) -> Result<FirewallRule, StoreError>;
    fn disable_firewall_rule(&self, id: &str) -> Result<FirewallRule, StoreError>;
    fn delete_firewall_rule(&self, id: &str) -> Result<(), StoreError>;

    fn list_networks(&self) -> Result<Vec<Network>, StoreError>;
    fn get_network(&self, id: &str) -> Result<Option<Network>, StoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    keys: Vec<Key>,
    images: Vec<Image>,
    packages: Vec<Package>,
    machines: Vec<Machine>,
    firewall_rules: Vec<FirewallRule>,
    networks: Vec<Network>,
}

impl StoreState {
    fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name || p.id == name)
    }

    fn image(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|i| i.id == id || i.name == id)
    }

    fn network(&self, id: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.id == id || n.name == id)
    }

    fn machine_mut(&mut self, id: &str) -> Result<&mut Machine, StoreError> {
        self.machines
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("machine", id))
    }

    fn firewall_rule_mut(&mut self, id: &str) -> Result<&mut FirewallRule, StoreError> {
        self.firewall_rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("firewall rule", id))
    }
}

/// In-memory store, kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the read-only catalog from `fixtures`.
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        Self {
            state: RwLock::new(StoreState {
                images: fixtures.images,
                packages: fixtures.packages,
                networks: fixtures.networks,
                ..Default::default()
            }),
        }
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.state_mut().images.push(image);
        self
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.state_mut().packages.push(package);
        self
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.state_mut().networks.push(network);
        self
    }

    fn state_mut(&mut self) -> &mut StoreState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }

    fn update_machine(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Machine) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let machine = state.machine_mut(id)?;
        apply(machine)?;
        machine.updated = now();
        Ok(())
    }

    fn set_machine_state(&self, id: &str, new_state: MachineState) -> Result<(), StoreError> {
        self.update_machine(id, |m| {
            m.state = new_state;
            Ok(())
        })
    }

    fn update_firewall_rule_with(
        &self,
        id: &str,
        apply: impl FnOnce(&mut FirewallRule),
    ) -> Result<FirewallRule, StoreError> {
        let mut state = self.write()?;
        let rule = state.firewall_rule_mut(id)?;
        apply(rule);
        Ok(rule.clone())
    }
}

impl CloudApiStore for MemoryStore {
    fn list_keys(&self) -> Result<Vec<Key>, StoreError> {
        Ok(self.read()?.keys.clone())
    }

    fn get_key(&self, name: &str) -> Result<Option<Key>, StoreError> {
        Ok(self.read()?.keys.iter().find(|k| k.name == name).cloned())
    }

    fn create_key(&self, name: &str, key: &str) -> Result<Key, StoreError> {
        if name.is_empty() {
            return Err(StoreError::InvalidArgument("key name is required".into()));
        }
        let mut state = self.write()?;
        if state.keys.iter().any(|k| k.name == name) {
            return Err(StoreError::Conflict {
                kind: "key",
                id: name.to_string(),
            });
        }

        let created = Key {
            name: name.to_string(),
            key: key.to_string(),
            fingerprint: fingerprint(key),
            created: Some(now()),
        };
        state.keys.push(created.clone());
        Ok(created)
    }

    fn delete_key(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let before = state.keys.len();
        state.keys.retain(|k| k.name != name);
        if state.keys.len() == before {
            return Err(not_found("key", name));
        }
        Ok(())
    }

    fn list_images(&self, filters: Option<&Filters>) -> Result<Vec<Image>, StoreError> {
        Ok(filtered(&self.read()?.images, filters))
    }

    fn get_image(&self, id: &str) -> Result<Option<Image>, StoreError> {
        Ok(self.read()?.images.iter().find(|i| i.id == id).cloned())
    }

    fn list_packages(&self, filters: Option<&Filters>) -> Result<Vec<Package>, StoreError> {
        Ok(filtered(&self.read()?.packages, filters))
    }

    fn get_package(&self, name: &str) -> Result<Option<Package>, StoreError> {
        Ok(self.read()?.package(name).cloned())
    }

    fn list_machines(&self, filters: Option<&Filters>) -> Result<Vec<Machine>, StoreError> {
        Ok(filtered(&self.read()?.machines, filters))
    }

    fn count_machines(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.machines.len())
    }

    fn get_machine(&self, id: &str) -> Result<Option<Machine>, StoreError> {
        Ok(self.read()?.machines.iter().find(|m| m.id == id).cloned())
    }

    fn create_machine(&self, request: CreateMachineRequest) -> Result<Machine, StoreError> {
        let mut state = self.write()?;

        let package = state.package(&request.package).cloned().ok_or_else(|| {
            StoreError::InvalidArgument(format!("package {:?} not found", request.package))
        })?;
        let image = state.image(&request.image).cloned().ok_or_else(|| {
            StoreError::InvalidArgument(format!("image {:?} not found", request.image))
        })?;
        let networks = request
            .networks
            .iter()
            .map(|n| {
                state.network(n).map(|net| net.id.clone()).ok_or_else(|| {
                    StoreError::InvalidArgument(format!("network {:?} not found", n))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = Uuid::new_v4().to_string();
        let name = if request.name.is_empty() {
            id.chars().take(8).collect()
        } else {
            request.name
        };
        let (machine_type, brand) = if image.image_type == "zvol" {
            ("virtualmachine", "kvm")
        } else {
            ("smartmachine", "joyent")
        };
        let ip = format!("10.88.88.{}", 50 + state.machines.len() % 200);
        let timestamp = now();

        let machine = Machine {
            id,
            name,
            machine_type: machine_type.to_string(),
            brand: brand.to_string(),
            state: MachineState::Running,
            image: image.id,
            package: package.name,
            memory: package.memory,
            disk: package.disk,
            metadata: request.metadata,
            tags: request.tags,
            created: timestamp.clone(),
            updated: timestamp,
            firewall_enabled: false,
            ips: vec![ip.clone()],
            networks,
            primary_ip: Some(ip),
        };
        state.machines.push(machine.clone());
        Ok(machine)
    }

    fn delete_machine(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let before = state.machines.len();
        state.machines.retain(|m| m.id != id);
        if state.machines.len() == before {
            return Err(not_found("machine", id));
        }
        Ok(())
    }

    fn stop_machine(&self, id: &str) -> Result<(), StoreError> {
        self.set_machine_state(id, MachineState::Stopped)
    }

    fn start_machine(&self, id: &str) -> Result<(), StoreError> {
        self.set_machine_state(id, MachineState::Running)
    }

    fn reboot_machine(&self, id: &str) -> Result<(), StoreError> {
        self.set_machine_state(id, MachineState::Running)
    }

    fn resize_machine(&self, id: &str, package: &str) -> Result<(), StoreError> {
        let package = self
            .read()?
            .package(package)
            .cloned()
            .ok_or_else(|| StoreError::InvalidArgument(format!("package {:?} not found", package)))?;
        self.update_machine(id, |m| {
            m.package = package.name;
            m.memory = package.memory;
            m.disk = package.disk;
            Ok(())
        })
    }

    fn rename_machine(&self, id: &str, name: &str) -> Result<(), StoreError> {
        if name.is_empty() {
            return Err(StoreError::InvalidArgument("machine name is required".into()));
        }
        self.update_machine(id, |m| {
            m.name = name.to_string();
            Ok(())
        })
    }

    fn enable_machine_firewall(&self, id: &str) -> Result<(), StoreError> {
        self.update_machine(id, |m| {
            m.firewall_enabled = true;
            Ok(())
        })
    }

    fn disable_machine_firewall(&self, id: &str) -> Result<(), StoreError> {
        self.update_machine(id, |m| {
            m.firewall_enabled = false;
            Ok(())
        })
    }

    fn list_machine_firewall_rules(&self, id: &str) -> Result<Vec<FirewallRule>, StoreError> {
        if id.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .read()?
            .firewall_rules
            .iter()
            .filter(|r| r.rule.contains(id))
            .cloned()
            .collect())
    }

    fn list_firewall_rules(&self) -> Result<Vec<FirewallRule>, StoreError> {
        Ok(self.read()?.firewall_rules.clone())
    }

    fn get_firewall_rule(&self, id: &str) -> Result<Option<FirewallRule>, StoreError> {
        Ok(self
            .read()?
            .firewall_rules
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    fn create_firewall_rule(&self, rule: &str, enabled: bool) -> Result<FirewallRule, StoreError> {
        if rule.is_empty() {
            return Err(StoreError::InvalidArgument("rule text is required".into()));
        }
        let created = FirewallRule {
            id: Uuid::new_v4().to_string(),
            rule: rule.to_string(),
            enabled,
            description: None,
        };
        self.write()?.firewall_rules.push(created.clone());
        Ok(created)
    }

    fn update_firewall_rule(
        &self,
        id: &str,
        rule: &str,
        enabled: bool,
    ) -> Result<FirewallRule, StoreError> {
        self.update_firewall_rule_with(id, |r| {
            r.rule = rule.to_string();
            r.enabled = enabled;
        })
    }

    fn enable_firewall_rule(&self, id: &str) -> Result<FirewallRule, StoreError> {
        self.update_firewall_rule_with(id, |r| r.enabled = true)
    }

    fn disable_firewall_rule(&self, id: &str) -> Result<FirewallRule, StoreError> {
        self.update_firewall_rule_with(id, |r| r.enabled = false)
    }

    fn delete_firewall_rule(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let before = state.firewall_rules.len();
        state.firewall_rules.retain(|r| r.id != id);
        if state.firewall_rules.len() == before {
            return Err(not_found("firewall rule", id));
        }
        Ok(())
    }

    fn list_networks(&self) -> Result<Vec<Network>, StoreError> {
        Ok(self.read()?.networks.clone())
    }

    fn get_network(&self, id: &str) -> Result<Option<Network>, StoreError> {
        Ok(self.read()?.networks.iter().find(|n| n.id == id).cloned())
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Keep the items whose JSON fields equal every filter value.
///
/// String fields compare raw; numbers and booleans compare by their JSON
/// text, so `memory=1024` and `enabled=true` both work.
fn filtered<T: Serialize + Clone>(items: &[T], filters: Option<&Filters>) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches_filters(*item, filters))
        .cloned()
        .collect()
}

fn matches_filters<T: Serialize>(item: &T, filters: Option<&Filters>) -> bool {
    let Some(filters) = filters else {
        return true;
    };
    let Ok(Value::Object(fields)) = serde_json::to_value(item) else {
        return false;
    };
    filters.iter().all(|(key, wanted)| match fields.get(key) {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == *wanted,
    })
}

/// MD5 fingerprint of an OpenSSH public key, as colon-separated hex.
///
/// Falls back to hashing the raw text when the key blob is not base64.
fn fingerprint(key: &str) -> String {
    let blob = key
        .split_whitespace()
        .nth(1)
        .and_then(|b| base64::engine::general_purpose::STANDARD.decode(b).ok())
        .unwrap_or_else(|| key.as_bytes().to_vec());
    Md5::digest(&blob)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
