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

//! SSH authentication methods and server verification.
//!
//! A connection is given a stack of [`AuthMethod`]s which are tried in order
//! on the same transport until one succeeds:
//! - Password authentication
//! - Keyboard-interactive authentication, answering server prompts from a
//!   table of case-insensitive prompt patterns
//!
//! Server verification is configured via [`ServerCheckMethod`].

use russh::client::{Handle, Handler, KeyboardInteractiveAuthResponse};
use zeroize::Zeroizing;

/// An authentification token.
///
/// Used when creating a [`Client`](super::Client) for authentification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthMethod {
    Password(Zeroizing<String>),
    KeyboardInteractive(AuthKeyboardInteractive),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PromptResponse {
    /// Lowercased pattern, matched with "contains".
    pattern: String,
    response: Zeroizing<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct AuthKeyboardInteractive {
    responses: Vec<PromptResponse>,
}

impl AuthMethod {
    /// Convenience method to create a [`AuthMethod`] from a string literal.
    pub fn with_password(password: &str) -> Self {
        Self::Password(Zeroizing::new(password.to_string()))
    }

    pub const fn with_keyboard_interactive(auth: AuthKeyboardInteractive) -> Self {
        Self::KeyboardInteractive(auth)
    }

    /// Password authentication, falling back to keyboard-interactive with a
    /// responder that answers `Password:` prompts with the same password.
    pub fn password_with_fallback(password: &str) -> Vec<Self> {
        vec![
            Self::with_password(password),
            Self::with_keyboard_interactive(AuthKeyboardInteractive::for_password(password)),
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            AuthMethod::Password(_) => "password",
            AuthMethod::KeyboardInteractive(_) => "keyboard-interactive",
        }
    }
}

impl AuthKeyboardInteractive {
    pub fn new() -> Self {
        Default::default()
    }

    /// Responder which supplies `password` to any prompt mentioning `Password:`.
    pub fn for_password(password: &str) -> Self {
        Self::new().with_response("Password:", password)
    }

    /// Adds a response for any prompt containing `pattern`, ignoring case.
    pub fn with_response(mut self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.push(PromptResponse {
            pattern: pattern.into().to_lowercase(),
            response: Zeroizing::new(response.into()),
        });

        self
    }

    /// Build the answers for one round of server prompts.
    ///
    /// The protocol wants exactly one answer per prompt, so prompts with no
    /// matching pattern get an empty answer.
    pub fn respond<S: AsRef<str>>(&self, prompts: &[S]) -> Vec<String> {
        prompts
            .iter()
            .map(|prompt| {
                let prompt = prompt.as_ref().to_lowercase();
                self.responses
                    .iter()
                    .find(|pr| prompt.contains(&pr.pattern))
                    .map(|pr| pr.response.to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl From<AuthKeyboardInteractive> for AuthMethod {
    fn from(value: AuthKeyboardInteractive) -> Self {
        Self::with_keyboard_interactive(value)
    }
}

/// Server host key verification methods.
///
/// These methods control how the client verifies the server's host key during connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ServerCheckMethod {
    /// No verification - accept any host key
    NoCheck,
    /// Use default known_hosts file (~/.ssh/known_hosts); unknown hosts are rejected
    DefaultKnownHostsFile,
    /// Use default known_hosts file, but let hosts it has no entry for through.
    /// A key that differs from a recorded one is still rejected.
    AcceptNewDefaultKnownHostsFile,
}

/// Try each method in turn until the server accepts one.
///
/// A rejected method moves on to the next one; transport errors abort
/// immediately. If every method is rejected, the last rejection is returned.
pub(super) async fn authenticate<H: Handler>(
    handle: &mut Handle<H>,
    username: &str,
    methods: &[AuthMethod],
) -> Result<(), super::Error> {
    let mut last_err = super::Error::NoAuthMethod;
    for method in methods {
        match authenticate_one(handle, username, method).await {
            Ok(()) => {
                tracing::debug!("Authenticated {} with {}", username, method.name());
                return Ok(());
            }
            Err(e) if e.is_auth_failure() => {
                tracing::debug!("{} authentication rejected: {}", method.name(), e);
                last_err = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err)
}

async fn authenticate_one<H: Handler>(
    handle: &mut Handle<H>,
    username: &str,
    auth: &AuthMethod,
) -> Result<(), super::Error> {
    match auth {
        AuthMethod::Password(password) => {
            let is_authentificated = handle
                .authenticate_password(username, password.as_str())
                .await?;
            if !is_authentificated.success() {
                return Err(super::Error::PasswordWrong);
            }
        }
        AuthMethod::KeyboardInteractive(kbd) => {
            let mut res = handle
                .authenticate_keyboard_interactive_start(username, None::<String>)
                .await?;
            loop {
                let prompts = match res {
                    KeyboardInteractiveAuthResponse::Success => break,
                    KeyboardInteractiveAuthResponse::Failure { .. } => {
                        return Err(super::Error::KeyboardInteractiveAuthFailed);
                    }
                    KeyboardInteractiveAuthResponse::InfoRequest { prompts, .. } => prompts,
                };

                let texts: Vec<&str> = prompts.iter().map(|p| p.prompt.as_str()).collect();
                tracing::trace!("Keyboard-interactive prompts: {:?}", texts);
                let responses = kbd.respond(&texts);

                res = handle
                    .authenticate_keyboard_interactive_respond(responses)
                    .await?;
            }
        }
    };
    Ok(())
}
