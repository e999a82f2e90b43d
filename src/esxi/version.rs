// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Installed version lookup and the up-to-date comparison.
//!
//! The comparison is literal substring surgery, not version parsing:
//!
//! ```text
//! "VMware ESXi 6.7.0 build-123456"  -> "6.7.0-123456"
//! "ESXi-6.7.0-123456-standard"      -> "6.7.0-123456"
//! ```
//!
//! Output that does not carry these exact markers (a localized banner, an
//! `ESXi-...-no-tools` profile) never compares equal and so always leads to
//! an update attempt. That is a known limitation, kept on purpose so the
//! behaviour matches what operators already rely on.

use anyhow::{Context, Result};

use super::RemoteShell;

pub const VERSION_COMMAND: &str = "vmware -v";

const VERSION_PREFIX: &str = "VMware ESXi ";
const VERSION_BUILD_MARKER: &str = " build";
const PROFILE_PREFIX: &str = "ESXi-";
const PROFILE_STANDARD_SUFFIX: &str = "-standard";

/// Read the installed version banner.
///
/// Returns `None` when the host printed nothing (or only whitespace); the
/// caller treats that as "stop here", not as an error.
pub async fn fetch_installed_version<S: RemoteShell + ?Sized>(shell: &S) -> Result<Option<String>> {
    let result = shell
        .run(VERSION_COMMAND)
        .await
        .context("Failed to query the installed ESXi version")?;

    let version = result.stdout.trim();
    if version.is_empty() {
        tracing::warn!(
            "Version query returned no output (exit status {})",
            result.exit_status
        );
        return Ok(None);
    }
    Ok(Some(version.to_string()))
}

/// `"VMware ESXi 6.7.0 build-123456"` becomes `"6.7.0-123456"`.
pub fn normalize_installed_version(version: &str) -> String {
    version
        .replace(VERSION_PREFIX, "")
        .replace(VERSION_BUILD_MARKER, "")
        .trim()
        .to_string()
}

/// `"ESXi-6.7.0-123456-standard"` becomes `"6.7.0-123456"`.
pub fn normalize_profile_id(profile_id: &str) -> String {
    profile_id
        .replace(PROFILE_STANDARD_SUFFIX, "")
        .replace(PROFILE_PREFIX, "")
        .trim()
        .to_string()
}

pub fn is_up_to_date(installed_version: &str, profile_id: &str) -> bool {
    normalize_installed_version(installed_version) == normalize_profile_id(profile_id)
}
