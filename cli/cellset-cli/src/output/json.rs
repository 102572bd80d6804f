// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! JSON output formatting

use std::io::Write;
use std::path::Path;

use serde::Serialize;

/// Write a value as pretty JSON to a file or stdout
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut writer = super::open(path)?;
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}
