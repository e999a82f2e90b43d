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

use clap::Parser;

use crate::commands::update::UpdatePlan;
use crate::esxi::{DEFAULT_DEPOT_URL, DEFAULT_RELEASE};
use crate::ssh::known_hosts::StrictHostKeyChecking;
use crate::utils::{sanitize_depot_url, sanitize_release};

#[derive(Parser, Debug)]
#[command(
    name = "esxup",
    version,
    about = "Update a standalone ESXi host to the latest standard image profile over SSH",
    long_about = "esxup connects to an ESXi host over SSH, makes sure the httpClient firewall ruleset is\nenabled, compares the installed build with the newest standard image profile published\nin the vendor depot for the selected release, and runs `esxcli software profile update`\nwhen the host is behind.\nHost, username and password are prompted for interactively; the password is never\naccepted on the command line.",
    after_help = "EXAMPLES:\n  Prompt for everything:        esxup\n  Pre-fill host and user:       esxup --host esx01.lab -l root\n  Target 7.0 profiles:          esxup --host esx01.lab --release 7.0\n  Non-interactive finish:       esxup --host esx01.lab --no-pause"
)]
pub struct Cli {
    #[arg(long, help = "ESXi host name or address (prompted for when omitted)")]
    pub host: Option<String>,

    #[arg(
        short = 'l',
        long,
        help = "Login name (prompted for when omitted, blank means root)"
    )]
    pub user: Option<String>,

    #[arg(short = 'p', long, default_value_t = 22, help = "SSH port")]
    pub port: u16,

    #[arg(
        long,
        default_value = DEFAULT_RELEASE,
        value_parser = parse_release,
        help = "Release whose image profiles are considered, as major.minor"
    )]
    pub release: String,

    #[arg(
        long,
        default_value = DEFAULT_DEPOT_URL,
        value_parser = parse_depot,
        help = "Depot index URL (http or https)"
    )]
    pub depot: String,

    #[arg(
        long = "strict-host-key-checking",
        value_enum,
        default_value_t = StrictHostKeyChecking::No,
        help = "Host key checking mode"
    )]
    pub strict_host_key_checking: StrictHostKeyChecking,

    #[arg(long, help = "Exit right after \"Done.\" instead of waiting for Enter")]
    pub no_pause: bool,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,
}

impl Cli {
    pub fn plan(&self) -> UpdatePlan {
        UpdatePlan {
            release: self.release.clone(),
            depot_url: self.depot.clone(),
        }
    }
}

fn parse_release(value: &str) -> Result<String, String> {
    sanitize_release(value).map_err(|e| e.to_string())
}

fn parse_depot(value: &str) -> Result<String, String> {
    sanitize_depot_url(value).map_err(|e| e.to_string())
}
