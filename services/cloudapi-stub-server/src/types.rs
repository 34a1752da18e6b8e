// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! CloudAPI resource representations served by the stub
//!
//! Every resource derives `Default`: a single-resource lookup that finds
//! nothing renders the zero value with a 200 rather than a 404.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Key-value tags
pub type Tags = BTreeMap<String, String>;

/// Key-value metadata
pub type Metadata = BTreeMap<String, String>;

/// SSH key information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    /// Key name
    pub name: String,
    /// SSH public key material
    pub key: String,
    /// Key fingerprint
    pub fingerprint: String,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// Request to create SSH key
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    /// Key name
    #[serde(default)]
    pub name: String,
    /// SSH public key material
    #[serde(default)]
    pub key: String,
}

/// Image information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image UUID
    pub id: String,
    /// Image name
    pub name: String,
    /// Image version
    #[serde(default)]
    pub version: String,
    /// Operating system
    #[serde(default)]
    pub os: String,
    /// Image type (zone-dataset, lx-dataset, zvol)
    #[serde(default, rename = "type")]
    pub image_type: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public image
    #[serde(default)]
    pub public: bool,
    /// Image state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Published timestamp
    #[serde(
        default,
        rename = "published_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<String>,
}

/// Package information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Package UUID
    pub id: String,
    /// Package name
    pub name: String,
    /// Memory in MB
    #[serde(default)]
    pub memory: u64,
    /// Disk space in MB
    #[serde(default)]
    pub disk: u64,
    /// Swap in MB
    #[serde(default)]
    pub swap: u64,
    /// VCPUs
    #[serde(default)]
    pub vcpus: u32,
    /// Lightweight processes
    #[serde(default)]
    pub lwps: u32,
    /// Default package
    #[serde(default)]
    pub default: bool,
    /// Version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Machine state
///
/// The zero value renders as an empty string, matching an unset state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineState {
    #[default]
    #[serde(rename = "")]
    Unknown,
    Provisioning,
    Running,
    Stopped,
}

/// Machine information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    /// Machine UUID
    pub id: String,
    /// Machine alias/name
    pub name: String,
    /// Machine type (smartmachine or virtualmachine)
    #[serde(rename = "type")]
    pub machine_type: String,
    /// Brand (joyent, kvm)
    pub brand: String,
    /// Current state
    pub state: MachineState,
    /// Image UUID
    pub image: String,
    /// Package name
    pub package: String,
    /// RAM in MB
    pub memory: u64,
    /// Disk space in MB
    pub disk: u64,
    /// Metadata
    pub metadata: Metadata,
    /// Tags
    pub tags: Tags,
    /// Creation timestamp
    pub created: String,
    /// Last update timestamp
    pub updated: String,
    /// Firewall enabled
    #[serde(rename = "firewall_enabled")]
    pub firewall_enabled: bool,
    /// IP addresses
    pub ips: Vec<String>,
    /// Network UUIDs
    pub networks: Vec<String>,
    /// Primary IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ip: Option<String>,
}

/// Request to create a machine
///
/// The wire format is a flat JSON object. Besides the named fields, any
/// `tag.<name>` key becomes a tag and any `metadata.<name>` key becomes a
/// metadata entry. Other keys are ignored and null values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCreateMachineRequest")]
pub struct CreateMachineRequest {
    /// Machine alias/name
    pub name: String,
    /// Package name or UUID
    pub package: String,
    /// Image name or UUID
    pub image: String,
    /// Networks (names or UUIDs)
    pub networks: Vec<String>,
    /// Metadata from `metadata.*` keys
    pub metadata: Metadata,
    /// Tags from `tag.*` keys
    pub tags: Tags,
}

const TAG_PREFIX: &str = "tag.";
const METADATA_PREFIX: &str = "metadata.";

#[derive(Deserialize)]
struct RawCreateMachineRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    networks: Option<Vec<String>>,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

/// A prefixed attribute whose value is not a string
#[derive(Debug, Error)]
#[error("value of {key:?} must be a string, got {found}")]
pub struct AttributeError {
    key: String,
    found: &'static str,
}

impl TryFrom<RawCreateMachineRequest> for CreateMachineRequest {
    type Error = AttributeError;

    fn try_from(raw: RawCreateMachineRequest) -> Result<Self, Self::Error> {
        let mut metadata = Metadata::new();
        let mut tags = Tags::new();

        for (key, value) in raw.attributes {
            let target = if let Some(name) = key.strip_prefix(TAG_PREFIX) {
                Some((&mut tags, name.to_string()))
            } else {
                key.strip_prefix(METADATA_PREFIX)
                    .map(|name| (&mut metadata, name.to_string()))
            };
            let Some((map, name)) = target else {
                continue;
            };

            match value {
                Value::Null => {}
                Value::String(s) => {
                    map.insert(name, s);
                }
                other => {
                    return Err(AttributeError {
                        key,
                        found: json_type_name(&other),
                    });
                }
            }
        }

        Ok(Self {
            name: raw.name.unwrap_or_default(),
            package: raw.package.unwrap_or_default(),
            image: raw.image.unwrap_or_default(),
            networks: raw.networks.unwrap_or_default(),
            metadata,
            tags,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Firewall rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    /// Rule UUID
    pub id: String,
    /// Rule text
    pub rule: String,
    /// Enabled
    pub enabled: bool,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to create or update a firewall rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleRequest {
    /// Rule text
    #[serde(default)]
    pub rule: String,
    /// Enabled (defaults to false)
    #[serde(default)]
    pub enabled: bool,
}

/// Network information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network UUID
    pub id: String,
    /// Network name
    pub name: String,
    /// Public network
    #[serde(default)]
    pub public: bool,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
