// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Configuration path resolution

use std::path::{Path, PathBuf};

/// Get the cellset configuration directory
///
/// Priority:
/// 1. --config-dir / CELLSET_CONFIG_DIR
/// 2. Platform config dir (~/.config/cellset on Linux)
/// 3. ~/.cellset
pub fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }

    dirs::config_dir()
        .map(|dir| dir.join("cellset"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cellset")
        })
}

/// Get the path to the main config file
pub fn config_file(dir: &Path) -> PathBuf {
    dir.join("config.json")
}
