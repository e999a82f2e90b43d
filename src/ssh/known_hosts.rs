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

use super::tokio_client::ServerCheckMethod;
use anyhow::{bail, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Get the default known_hosts file path
pub fn get_default_known_hosts_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".ssh").join("known_hosts"))
}

/// Create a ServerCheckMethod based on strict host key checking mode
pub fn get_check_method(strict_mode: StrictHostKeyChecking) -> Result<ServerCheckMethod> {
    check_method_for(strict_mode, get_default_known_hosts_path().as_deref())
}

/// `Yes` refuses to run without a known_hosts file rather than quietly
/// turning verification off.
fn check_method_for(
    strict_mode: StrictHostKeyChecking,
    known_hosts: Option<&Path>,
) -> Result<ServerCheckMethod> {
    match strict_mode {
        StrictHostKeyChecking::Yes => match known_hosts {
            Some(path) if path.exists() => {
                tracing::debug!("Using known_hosts file: {:?} (strict mode)", path);
                Ok(ServerCheckMethod::DefaultKnownHostsFile)
            }
            Some(path) => bail!(
                "Strict host key checking requested but {} does not exist",
                path.display()
            ),
            None => bail!("Strict host key checking requested but no home directory was found"),
        },
        StrictHostKeyChecking::AcceptNew => {
            tracing::debug!("accept-new: unknown hosts pass, changed keys are rejected");
            Ok(ServerCheckMethod::AcceptNewDefaultKnownHostsFile)
        }
        StrictHostKeyChecking::No => {
            tracing::debug!("Host key checking disabled (strict mode = no)");
            Ok(ServerCheckMethod::NoCheck)
        }
    }
}

/// Mode for host key checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StrictHostKeyChecking {
    /// Always verify host keys against ~/.ssh/known_hosts
    Yes,
    /// Never verify host keys (accept all)
    #[default]
    No,
    /// Accept hosts missing from ~/.ssh/known_hosts, reject changed keys
    AcceptNew,
}
