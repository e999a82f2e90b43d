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

//! Image profile listing, selection and installation.

use anyhow::{bail, Context, Result};
use std::fmt;

use super::RemoteShell;
use crate::ssh::CommandExecutedResult;
use crate::utils::sanitize_depot_url;

/// One line of `esxcli software sources profile list` output:
/// `"<profile-id> <vendor> <acceptance> <created> <updated>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProfileLine(String);

impl ProfileLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    /// The profile identifier, i.e. the first whitespace-separated token.
    pub fn id(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or("")
    }

    /// Standard (not `-no-tools`) image profile with a year-coded build.
    ///
    /// The `20` check is a heuristic for build numbers like
    /// `20190802001`; it does not parse anything.
    pub fn is_standard_release(&self) -> bool {
        let id = self.id();
        id.contains("standard") && id.contains("20")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn list_command(depot_url: &str, release: &str) -> String {
    format!("esxcli software sources profile list -d {depot_url} | grep -i \"ESXi-{release}\"")
}

pub fn update_command(depot_url: &str, profile_id: &str) -> String {
    format!("esxcli software profile update -d {depot_url} -p {profile_id}")
}

/// Split listing output into lines, in the order the host printed them.
pub fn parse_profile_lines(output: &str) -> Vec<ProfileLine> {
    output.lines().map(ProfileLine::new).collect()
}

/// Fetch the depot's profiles for `release` (e.g. `"6.7"`).
pub async fn list_profiles<S: RemoteShell + ?Sized>(
    shell: &S,
    depot_url: &str,
    release: &str,
) -> Result<Vec<ProfileLine>> {
    sanitize_depot_url(depot_url)?;
    let result = shell
        .run(&list_command(depot_url, release))
        .await
        .context("Failed to list image profiles from the depot")?;

    if !result.stderr.trim().is_empty() {
        tracing::warn!("Profile listing reported: {}", result.stderr.trim());
    }

    let lines = parse_profile_lines(&result.stdout);
    tracing::debug!("Depot returned {} profile lines", lines.len());
    Ok(lines)
}

/// The greatest qualifying line under plain string ordering.
///
/// Depot identifiers are zero-padded consistently, so string order is
/// release order.
pub fn select_latest(lines: &[ProfileLine]) -> Option<&ProfileLine> {
    lines.iter().filter(|line| line.is_standard_release()).max()
}

/// Check that a profile id taken from remote output is safe to put back
/// on a command line.
pub fn validate_profile_id(profile_id: &str) -> Result<()> {
    if profile_id.is_empty() {
        bail!("Empty profile identifier");
    }
    let valid_chars = |c: char| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
    if !profile_id.chars().all(valid_chars) {
        bail!("Unexpected characters in profile identifier: {profile_id:?}");
    }
    Ok(())
}

/// Install `profile_id` from the depot. The command's output is returned as-is.
pub async fn update_profile<S: RemoteShell + ?Sized>(
    shell: &S,
    depot_url: &str,
    profile_id: &str,
) -> Result<CommandExecutedResult> {
    sanitize_depot_url(depot_url)?;
    validate_profile_id(profile_id)?;

    let result = shell
        .run(&update_command(depot_url, profile_id))
        .await
        .with_context(|| format!("Failed to run the update to {profile_id}"))?;

    if !result.is_success() {
        tracing::warn!(
            "Update to {} exited with status {}",
            profile_id,
            result.exit_status
        );
    }
    Ok(result)
}
