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

//! Error type for the SSH client layer.

use std::io;

/// Errors raised while connecting, authenticating or running commands.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Address could not be resolved: {0}")]
    AddressInvalid(io::Error),
    #[error("The server rejected the password")]
    PasswordWrong,
    #[error("Keyboard-interactive authentication failed")]
    KeyboardInteractiveAuthFailed,
    #[error("No authentication method was configured")]
    NoAuthMethod,
    #[error("Server host key verification failed")]
    ServerCheckFailed,
    #[error("The remote command closed without reporting an exit status")]
    CommandDidntExit,
    #[error("Command validation failed: {0}")]
    CommandValidationFailed(String),
    #[error("SSH error: {0}")]
    SshError(#[from] russh::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Whether the server turned our credentials down, as opposed to the
    /// connection or the protocol failing.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Error::PasswordWrong | Error::KeyboardInteractiveAuthFailed | Error::NoAuthMethod
        )
    }
}
