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

//! The update run: connect, check, compare, update, disconnect.

use anyhow::{Context, Result};
use std::io::{self, Write};

use crate::credentials::{self, Credentials};
use crate::esxi::{self, FirewallState, RemoteShell};
use crate::ssh::known_hosts::{get_check_method, StrictHostKeyChecking};
use crate::ssh::{AuthMethod, Client};

pub struct UpdateCommandParams {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: u16,
    pub strict_mode: StrictHostKeyChecking,
    pub plan: UpdatePlan,
}

/// What to look for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    /// `major.minor` used to filter the depot listing, e.g. `6.7`.
    pub release: String,
    pub depot_url: String,
}

impl Default for UpdatePlan {
    fn default() -> Self {
        Self {
            release: esxi::DEFAULT_RELEASE.to_string(),
            depot_url: esxi::DEFAULT_DEPOT_URL.to_string(),
        }
    }
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Installed build already matches the latest standard profile.
    UpToDate { profile: String },
    /// The update command was issued for `profile` and exited with
    /// `exit_status`; anything but 0 means the installer reported a failure.
    Updated { profile: String, exit_status: u32 },
    /// `vmware -v` printed nothing; stopped before listing profiles.
    VersionUnavailable,
    /// The depot listing had no standard, year-coded profile.
    NoQualifyingProfile,
}

/// Prompt for credentials, connect, and run the update.
pub async fn execute_update(params: UpdateCommandParams) -> Result<UpdateOutcome> {
    let credentials = credentials::capture(params.host, params.user)?;
    let client = connect(&credentials, params.port, params.strict_mode).await?;
    let mut stdout = io::stdout();
    run_update(&client, &params.plan, &mut stdout).await
}

/// Open the one session used for the whole run.
///
/// Password authentication is tried first; servers that only offer
/// keyboard-interactive get the same password through the prompt responder.
pub async fn connect(
    credentials: &Credentials,
    port: u16,
    strict_mode: StrictHostKeyChecking,
) -> Result<Client> {
    tracing::info!(
        "Connecting to {}@{}:{}",
        credentials.username,
        credentials.host,
        port
    );
    let server_check = get_check_method(strict_mode)?;
    Client::connect(
        (credentials.host.clone(), port),
        &credentials.username,
        AuthMethod::password_with_fallback(credentials.password()),
        server_check,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to connect to {}@{}:{}",
            credentials.username, credentials.host, port
        )
    })
}

/// Run every remote step, then close the session exactly once.
///
/// The session is closed whether the steps succeeded, stopped early, or
/// failed. A failing close is logged and does not mask the steps' result.
pub async fn run_update<S, W>(shell: &S, plan: &UpdatePlan, out: &mut W) -> Result<UpdateOutcome>
where
    S: RemoteShell + ?Sized,
    W: Write,
{
    let result = run_steps(shell, plan, out).await;

    if let Err(e) = shell.close().await {
        tracing::warn!("Failed to close the SSH session cleanly: {}", e);
    }

    result
}

async fn run_steps<S, W>(shell: &S, plan: &UpdatePlan, out: &mut W) -> Result<UpdateOutcome>
where
    S: RemoteShell + ?Sized,
    W: Write,
{
    if esxi::ensure_http_client_enabled(shell).await? == FirewallState::EnableRequested {
        writeln!(out, "Enabled the httpClient firewall ruleset.")?;
    }

    let Some(installed) = esxi::fetch_installed_version(shell).await? else {
        writeln!(out, "Could not read the installed ESXi version.")?;
        return Ok(UpdateOutcome::VersionUnavailable);
    };
    writeln!(out, "{installed}")?;

    writeln!(out, "Fetching profile list...")?;
    out.flush()?;
    let profiles = esxi::list_profiles(shell, &plan.depot_url, &plan.release).await?;

    let Some(latest) = esxi::select_latest(&profiles) else {
        writeln!(
            out,
            "No standard profile found for ESXi {} in the depot.",
            plan.release
        )?;
        return Ok(UpdateOutcome::NoQualifyingProfile);
    };
    writeln!(out, "{latest}")?;

    let profile = latest.id().to_string();
    if esxi::is_up_to_date(&installed, &profile) {
        writeln!(out, "ESXi is up to date.")?;
        return Ok(UpdateOutcome::UpToDate { profile });
    }

    writeln!(out, "Updating ESXi to '{profile}'")?;
    out.flush()?;
    let result = esxi::update_profile(shell, &plan.depot_url, &profile).await?;
    writeln!(out, "{}", result.stdout)?;
    if !result.stderr.trim().is_empty() {
        writeln!(out, "{}", result.stderr.trim_end())?;
    }
    if !result.is_success() {
        writeln!(
            out,
            "The update command exited with status {}.",
            result.exit_status
        )?;
    }

    Ok(UpdateOutcome::Updated {
        profile,
        exit_status: result.exit_status,
    })
}
