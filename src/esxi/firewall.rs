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

//! Outbound HTTP client firewall ruleset.
//!
//! `esxcli software` needs the `httpClient` ruleset to reach the depot.

use anyhow::{Context, Result};

use super::RemoteShell;

pub const HTTP_CLIENT_RULESET: &str = "httpClient";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirewallState {
    AlreadyEnabled,
    /// The enable command was sent. Its effect is not verified.
    EnableRequested,
}

pub fn status_command() -> String {
    format!("esxcli network firewall ruleset list -r {HTTP_CLIENT_RULESET}")
}

pub fn enable_command() -> String {
    format!("esxcli network firewall ruleset set -e true -r {HTTP_CLIENT_RULESET}")
}

/// Enable the `httpClient` ruleset unless its status already says `true`.
pub async fn ensure_http_client_enabled<S: RemoteShell + ?Sized>(
    shell: &S,
) -> Result<FirewallState> {
    let status = shell
        .run(&status_command())
        .await
        .context("Failed to query the httpClient firewall ruleset")?;

    if status.stdout.contains("true") {
        tracing::debug!("{} ruleset already enabled", HTTP_CLIENT_RULESET);
        return Ok(FirewallState::AlreadyEnabled);
    }

    tracing::info!("Enabling {} firewall ruleset", HTTP_CLIENT_RULESET);
    shell
        .run(&enable_command())
        .await
        .context("Failed to enable the httpClient firewall ruleset")?;
    Ok(FirewallState::EnableRequested)
}
