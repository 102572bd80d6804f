// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Persistent CLI defaults

use std::path::Path;

use aggregate_api::DEFAULT_QUALIFYING_PATH;
use anyhow::Context;
use cellset::{DecodeOptions, OutputFormat};
use serde::{Deserialize, Serialize};

/// Contents of config.json; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Qualifying path for dimensions and filters (default "Employee")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying_path: Option<String>,

    /// Default output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Dimension names treated as the measures axis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures_dimensions: Vec<String>,

    /// Metric id used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<String>,
}

impl Config {
    /// Load config.json from `dir`; a missing file yields the defaults
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = super::paths::config_file(dir);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn qualifying_path(&self) -> &str {
        self.qualifying_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_QUALIFYING_PATH)
    }

    /// Flag value if given, else the configured format, else CSV
    pub fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }

    /// Decode options; names given on the command line replace the configured
    /// list, and with neither the library default (`Measures`) applies
    pub fn decode_options(&self, flag: &[String]) -> DecodeOptions {
        let names = if !flag.is_empty() {
            flag.to_vec()
        } else if !self.measures_dimensions.is_empty() {
            self.measures_dimensions.clone()
        } else {
            return DecodeOptions::default();
        };
        DecodeOptions {
            measures_dimensions: names,
        }
    }

    /// Flag value if given, else the configured metric id
    pub fn metric_id(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.metric_id.clone()).filter(|id| !id.is_empty())
    }
}
