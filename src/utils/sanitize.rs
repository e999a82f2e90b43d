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

//! Validation for operator input and for the command lines we build from it.

use anyhow::{bail, Result};
use tracing::warn;

const MAX_COMMAND_LENGTH: usize = 16384;
const MAX_HOSTNAME_LENGTH: usize = 253; // DNS limit
const MAX_USERNAME_LENGTH: usize = 32;
const MAX_URL_LENGTH: usize = 2048;

/// Check a remote command line before it is sent.
///
/// Rejects empty, over-long and NUL-carrying commands. Shell substitution
/// is only warned about: the commands sent by this tool are fixed
/// templates, so a hit means a template parameter slipped through.
pub fn sanitize_command(command: &str) -> Result<String> {
    if command.trim().is_empty() {
        bail!("Empty command not allowed");
    }

    if command.len() > MAX_COMMAND_LENGTH {
        bail!(
            "Command too long: {} bytes (max: {} bytes)",
            command.len(),
            MAX_COMMAND_LENGTH
        );
    }

    if command.contains('\0') {
        bail!("Command contains null bytes");
    }

    let substitution_patterns = [
        ("$(", "command substitution"),
        ("${", "variable substitution"),
        ("`", "backtick command substitution"),
        (";\n", "command chaining with newline"),
    ];

    for (pattern, description) in &substitution_patterns {
        if command.contains(pattern) {
            warn!(
                "Unexpected shell pattern in command: {} ({})",
                pattern, description
            );
        }
    }

    Ok(command.to_string())
}

/// Validate the host typed at the `Host:` prompt.
pub fn sanitize_hostname(hostname: &str) -> Result<String> {
    if hostname.trim().is_empty() {
        bail!("Empty hostname not allowed");
    }

    if hostname.len() > MAX_HOSTNAME_LENGTH {
        bail!(
            "Hostname too long: {} bytes (max: {} bytes)",
            hostname.len(),
            MAX_HOSTNAME_LENGTH
        );
    }

    if let Some(ipv6) = hostname
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        if !ipv6.chars().all(|c| c.is_ascii_hexdigit() || c == ':') {
            bail!("Invalid IPv6 address format: {}", hostname);
        }
        return Ok(ipv6.to_string());
    }

    let valid_chars = |c: char| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
    if !hostname.chars().all(valid_chars) {
        bail!("Invalid characters in hostname: {}", hostname);
    }

    if hostname.contains("..") {
        bail!("Double dots not allowed in hostname");
    }

    if hostname
        .split('.')
        .any(|segment| segment.starts_with('-') || segment.ends_with('-'))
    {
        bail!("Hostname segments cannot start or end with hyphen");
    }

    Ok(hostname.to_string())
}

/// Validate the login name typed at the `Username (root):` prompt.
pub fn sanitize_username(username: &str) -> Result<String> {
    if username.trim().is_empty() {
        bail!("Empty username not allowed");
    }

    if username.len() > MAX_USERNAME_LENGTH {
        bail!(
            "Username too long: {} bytes (max: {} bytes)",
            username.len(),
            MAX_USERNAME_LENGTH
        );
    }

    let valid_chars = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.';
    if !username.chars().all(valid_chars) {
        bail!("Invalid characters in username: {}", username);
    }

    if let Some(first_char) = username.chars().next() {
        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            bail!("Username must start with letter or underscore");
        }
    }

    Ok(username.to_string())
}

/// Validate a `major.minor` release filter such as `6.7`.
///
/// The value ends up inside a `grep` pattern on the host, so only digits
/// and dots get through.
pub fn sanitize_release(release: &str) -> Result<String> {
    let release = release.trim();
    if release.is_empty() {
        bail!("Empty release not allowed");
    }
    if !release.chars().all(|c| c.is_ascii_digit() || c == '.') {
        bail!("Release must contain only digits and dots: {}", release);
    }
    if release.starts_with('.') || release.ends_with('.') || release.contains("..") {
        bail!("Malformed release: {}", release);
    }
    Ok(release.to_string())
}

/// Validate the depot index URL passed with `-d` to `esxcli`.
///
/// Only `http` and `https` URLs built from characters the remote shell
/// treats literally are accepted: no whitespace, quotes, `$`, `;`, `&`,
/// pipes, redirections, globs or brackets.
pub fn sanitize_depot_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        bail!("Empty depot URL not allowed");
    }

    if url.len() > MAX_URL_LENGTH {
        bail!(
            "Depot URL too long: {} bytes (max: {} bytes)",
            url.len(),
            MAX_URL_LENGTH
        );
    }

    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        bail!("Depot URL must start with http:// or https://: {}", url);
    };

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        bail!("Depot URL has no host: {}", url);
    }

    let valid_chars = |c: char| c.is_ascii_alphanumeric() || "-._~:/%+,@=".contains(c);
    if let Some(bad) = url.chars().find(|c| !valid_chars(*c)) {
        bail!("Invalid character {:?} in depot URL: {}", bad, url);
    }

    Ok(url.to_string())
}
