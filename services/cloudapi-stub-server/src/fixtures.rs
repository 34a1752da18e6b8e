// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Seed data for the read-only parts of the catalog

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::{Image, Network, Package};

/// Images, packages and networks loaded at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub images: Vec<Image>,
    pub packages: Vec<Package>,
    pub networks: Vec<Network>,
}

impl Fixtures {
    /// Path of the fixture file shipped with this crate
    pub fn default_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/default.json")
    }

    /// Load fixtures from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let fixtures: Fixtures = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!(
            images = fixtures.images.len(),
            packages = fixtures.packages.len(),
            networks = fixtures.networks.len(),
            "Loaded fixtures from {}",
            path.display()
        );

        Ok(fixtures)
    }
}
