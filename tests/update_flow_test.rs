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

//! End-to-end update runs against a scripted ESXi host.

mod common;

use common::*;
use esxup::ssh::tokio_client::Error;
use esxup::{run_update, UpdateOutcome, UpdatePlan};

const FIREWALL_ON: &str = "Name        Enabled\n----------  -------\nhttpClient     true\n";
const FIREWALL_OFF: &str = "Name        Enabled\n----------  -------\nhttpClient    false\n";

const PROFILES: &str = "\
ESXi-6.7.0-20190802001-no-tools   VMware, Inc.  PartnerSupported  2019-07-25T10:00:00  2019-07-25T10:00:00
ESXi-6.7.0-20190802001-standard   VMware, Inc.  PartnerSupported  2019-07-25T10:00:00  2019-07-25T10:00:00
ESXi-6.7.0-20191204001-standard   VMware, Inc.  PartnerSupported  2019-11-25T10:00:00  2019-11-25T10:00:00
ESXi-6.7.0-20191104001-standard   VMware, Inc.  PartnerSupported  2019-10-24T10:00:00  2019-10-24T10:00:00
";

const LATEST: &str = "ESXi-6.7.0-20191204001-standard";

async fn run(shell: &MockShell) -> (anyhow::Result<UpdateOutcome>, String) {
    let mut out = Vec::new();
    let result = run_update(shell, &UpdatePlan::default(), &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_outdated_host_gets_exactly_one_update() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-14320388\n")
        .reply(PROFILE_LIST, PROFILES)
        .reply(PROFILE_UPDATE, "Update Result\n   Message: The update completed successfully\n");

    let (result, out) = run(&shell).await;

    assert_eq!(
        result.unwrap(),
        UpdateOutcome::Updated {
            profile: LATEST.to_string(),
            exit_status: 0,
        }
    );
    assert_eq!(shell.ran(PROFILE_UPDATE), 1);
    let update = shell
        .commands()
        .into_iter()
        .find(|c| c.starts_with(PROFILE_UPDATE))
        .unwrap();
    assert!(update.ends_with(&format!("-p {LATEST}")));
    assert!(update.contains(esxup::esxi::DEFAULT_DEPOT_URL));

    assert!(out.contains("Fetching profile list..."));
    assert!(out.contains(&format!("Updating ESXi to '{LATEST}'")));
    assert!(out.contains("The update completed successfully"));
    assert!(!out.contains("exited with status"));
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_commands_are_issued_in_order() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_OFF)
        .reply(VERSION, "VMware ESXi 6.7.0 build-100000")
        .reply(PROFILE_LIST, "ESXi-6.7.0-123456-standard desc\nESXi-6.7.0-20190101-standard desc\n");

    let (result, _) = run(&shell).await;
    assert!(result.is_ok());

    let order: Vec<&str> = shell
        .commands()
        .iter()
        .map(|c| {
            [FIREWALL_LIST, FIREWALL_SET, VERSION, PROFILE_LIST, PROFILE_UPDATE]
                .into_iter()
                .find(|p| c.starts_with(p))
                .unwrap()
        })
        .collect();
    assert_eq!(
        order,
        vec![FIREWALL_LIST, FIREWALL_SET, VERSION, PROFILE_LIST, PROFILE_UPDATE]
    );
}

#[tokio::test]
async fn test_matching_build_is_up_to_date() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-20191204001")
        .reply(PROFILE_LIST, PROFILES);

    let (result, out) = run(&shell).await;

    assert_eq!(
        result.unwrap(),
        UpdateOutcome::UpToDate {
            profile: LATEST.to_string()
        }
    );
    assert_eq!(shell.ran(PROFILE_UPDATE), 0);
    assert!(out.contains("up to date"));
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_firewall_enable_only_when_disabled() {
    let enabled = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-20191204001")
        .reply(PROFILE_LIST, PROFILES);
    run(&enabled).await.0.unwrap();
    assert_eq!(enabled.ran(FIREWALL_SET), 0);

    let disabled = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_OFF)
        .reply(VERSION, "VMware ESXi 6.7.0 build-20191204001")
        .reply(PROFILE_LIST, PROFILES);
    let (_, out) = run(&disabled).await;
    assert_eq!(disabled.ran(FIREWALL_SET), 1);
    assert!(out.contains("Enabled the httpClient firewall ruleset."));
}

#[tokio::test]
async fn test_empty_version_stops_before_profiles() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "  \n")
        .reply(PROFILE_LIST, PROFILES);

    let (result, out) = run(&shell).await;

    assert_eq!(result.unwrap(), UpdateOutcome::VersionUnavailable);
    assert_eq!(shell.ran(PROFILE_LIST), 0);
    assert_eq!(shell.ran(PROFILE_UPDATE), 0);
    assert!(!out.contains("Fetching profile list..."));
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_no_qualifying_profile_is_not_an_error() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-100000")
        .reply(
            PROFILE_LIST,
            "ESXi-6.7.0-8169922-standard desc\nESXi-6.7.0-20191204001-no-tools desc\n",
        );

    let (result, out) = run(&shell).await;

    assert_eq!(result.unwrap(), UpdateOutcome::NoQualifyingProfile);
    assert_eq!(shell.ran(PROFILE_UPDATE), 0);
    assert!(out.contains("No standard profile found for ESXi 6.7"));
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_empty_listing_is_no_qualifying_profile() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-100000");

    let (result, _) = run(&shell).await;
    assert_eq!(result.unwrap(), UpdateOutcome::NoQualifyingProfile);
}

#[tokio::test]
async fn test_remote_error_is_reported_and_session_closed() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-100000")
        .fail(PROFILE_LIST, || Error::CommandDidntExit);

    let (result, _) = run(&shell).await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to list image profiles"));
    assert!(err
        .chain()
        .any(|cause| cause.to_string().contains("without reporting an exit status")));
    assert_eq!(shell.ran(PROFILE_UPDATE), 0);
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_first_command_failure_still_closes_once() {
    let shell = MockShell::new().fail(FIREWALL_LIST, || {
        Error::IoError(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ))
    });

    let (result, _) = run(&shell).await;

    assert!(result.is_err());
    assert_eq!(shell.commands().len(), 1);
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_close_failure_does_not_mask_outcome() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "")
        .fail_close();

    let (result, _) = run(&shell).await;

    assert_eq!(result.unwrap(), UpdateOutcome::VersionUnavailable);
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_failed_installer_reports_stderr_and_status() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 6.7.0 build-100000")
        .reply(PROFILE_LIST, PROFILES)
        .reply_with_status(
            PROFILE_UPDATE,
            "",
            "[InstallationError] Not enough space on /bootbank",
            1,
        );

    let (result, out) = run(&shell).await;

    assert_eq!(
        result.unwrap(),
        UpdateOutcome::Updated {
            profile: LATEST.to_string(),
            exit_status: 1,
        }
    );
    assert!(out.contains("Not enough space on /bootbank"));
    assert!(out.contains("The update command exited with status 1."));
    assert_eq!(shell.closes(), 1);
}

#[tokio::test]
async fn test_release_filter_reaches_the_listing_command() {
    let shell = MockShell::new()
        .reply(FIREWALL_LIST, FIREWALL_ON)
        .reply(VERSION, "VMware ESXi 7.0.3 build-100000");
    let plan = UpdatePlan {
        release: "7.0".to_string(),
        depot_url: "https://depot.example/index.xml".to_string(),
    };

    let mut out = Vec::new();
    run_update(&shell, &plan, &mut out).await.unwrap();

    let listing = shell
        .commands()
        .into_iter()
        .find(|c| c.starts_with(PROFILE_LIST))
        .unwrap();
    assert_eq!(
        listing,
        "esxcli software sources profile list -d https://depot.example/index.xml | grep -i \"ESXi-7.0\""
    );
}
