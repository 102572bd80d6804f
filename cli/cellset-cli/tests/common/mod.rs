// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Test helpers for cellset-cli integration tests

// Allow unused code - not every test file uses every helper
// Allow deprecated - cargo_bin is standard for CLI testing
#![allow(dead_code, deprecated)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Path to a file under tests/fixtures
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Get a Command for running the cellset binary, isolated from the user's
/// config directory and metric id
pub fn cellset_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cellset").expect("Failed to find cellset binary");
    cmd.env("CELLSET_CONFIG_DIR", config_dir)
        .env_remove("CELLSET_METRIC_ID")
        .env_remove("RUST_LOG");
    cmd
}

/// Scratch config directory, optionally seeded with a config.json
pub fn config_dir(config_json: Option<&str>) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    if let Some(json) = config_json {
        std::fs::write(dir.path().join("config.json"), json).expect("Failed to write config.json");
    }
    dir
}
