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

//! Profile selection and version comparison on realistic depot output.

use esxup::esxi::profile::{parse_profile_lines, select_latest, ProfileLine};
use esxup::esxi::version::{is_up_to_date, normalize_installed_version, normalize_profile_id};

#[test]
fn test_latest_of_the_documented_sample() {
    let lines: Vec<ProfileLine> = [
        "ESXi-6.7.0-100-standard desc",
        "ESXi-6.7.0-200-standard desc",
        "ESXi-6.0.0-999-nostandard desc",
    ]
    .into_iter()
    .map(ProfileLine::new)
    .collect();

    let latest = select_latest(&lines).unwrap();
    assert_eq!(latest.as_str(), "ESXi-6.7.0-200-standard desc");
    assert_eq!(latest.id(), "ESXi-6.7.0-200-standard");
}

#[test]
fn test_latest_from_listing_output() {
    let output = "\
ESXi-6.7.0-20181002001-standard  VMware, Inc.  PartnerSupported  2018-10-02T10:00:00  2018-10-02T10:00:00\r
ESXi-6.7.0-20181002001-no-tools  VMware, Inc.  PartnerSupported  2018-10-02T10:00:00  2018-10-02T10:00:00\r
\r
ESXi-6.7.0-20200604001-standard  VMware, Inc.  PartnerSupported  2020-06-04T10:00:00  2020-06-04T10:00:00\r
ESXi-6.7.0-20200401001s-standard VMware, Inc.  PartnerSupported  2020-04-01T10:00:00  2020-04-01T10:00:00\r
";
    let lines = parse_profile_lines(output);
    assert_eq!(lines.len(), 5);
    assert_eq!(
        select_latest(&lines).map(ProfileLine::id),
        Some("ESXi-6.7.0-20200604001-standard")
    );
}

#[test]
fn test_documented_comparisons() {
    assert_eq!(
        normalize_installed_version("VMware ESXi 6.7.0 build-123456"),
        normalize_profile_id("ESXi-6.7.0-123456-standard")
    );
    assert!(is_up_to_date(
        "VMware ESXi 6.7.0 build-123456",
        "ESXi-6.7.0-123456-standard"
    ));
    assert!(!is_up_to_date(
        "VMware ESXi 6.7.0 build-100000",
        "ESXi-6.7.0-123456-standard"
    ));
}
