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

//! ESXi host operations expressed as `esxcli` / `vmware` command lines.
//!
//! Every step talks to the host through [`RemoteShell`] so that it can be
//! driven by an SSH [`Client`](crate::ssh::Client) in production and by a
//! scripted shell in tests.

pub mod firewall;
pub mod profile;
pub mod shell;
pub mod version;

pub use firewall::{ensure_http_client_enabled, FirewallState};
pub use profile::{list_profiles, select_latest, update_profile, ProfileLine};
pub use shell::RemoteShell;
pub use version::{fetch_installed_version, is_up_to_date};

/// VMware's public online depot index.
pub const DEFAULT_DEPOT_URL: &str =
    "https://hostupdate.vmware.com/software/VUM/PRODUCTION/main/vmw-depot-index.xml";

/// Release whose profiles are considered when no `--release` is given.
pub const DEFAULT_RELEASE: &str = "6.7";
