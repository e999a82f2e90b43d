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

//! Interactive credential capture.
//!
//! Host and username are read as plain lines. The password is read one
//! keypress at a time in raw mode and echoed back as a run of `*` once Enter
//! is pressed. Capture is written against generic readers and a key-event
//! iterator so the terminal can be swapped for scripted input in tests.

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::ui::RawModeGuard;
use crate::utils::{sanitize_hostname, sanitize_username};

/// Login used when the username prompt is left blank.
pub const DEFAULT_USERNAME: &str = "root";

/// Everything needed to open the session.
///
/// The password lives only in process memory and is zeroized on drop.
pub struct Credentials {
    pub host: String,
    pub username: String,
    password: SecretString,
}

impl Credentials {
    /// Build credentials, applying the blank-input gate and input validation.
    pub fn new(host: &str, username: &str, password: SecretString) -> Result<Self> {
        if host.trim().is_empty() {
            bail!("Host is required");
        }
        if password.expose_secret().is_empty() {
            bail!("Password is required");
        }

        let username = match username.trim() {
            "" => DEFAULT_USERNAME,
            name => name,
        };

        Ok(Self {
            host: sanitize_hostname(host.trim()).context("Invalid host")?,
            username: sanitize_username(username).context("Invalid username")?,
            password,
        })
    }

    /// The captured password, for handing to the authentication methods.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Print `label` and read one line, without its line ending.
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{label} ")?;
    out.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read answer to '{label}'"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Collect a secret from a stream of key events.
///
/// Character keys are appended in order; Enter finishes; Ctrl-C aborts.
/// Tab and Backspace are kept as the characters they stand for (`\t`,
/// `\u{8}`) rather than edited away, so the secret is exactly what was
/// typed. Navigation keys, function keys and key releases are ignored. Once
/// Enter arrives, one `*` per captured character is written to `out`,
/// followed by `\r\n` since the terminal is usually in raw mode.
pub fn read_masked<I, W>(keys: I, out: &mut W) -> Result<SecretString>
where
    I: IntoIterator<Item = io::Result<KeyEvent>>,
    W: Write,
{
    let mut secret = zeroize::Zeroizing::new(String::new());

    for key in keys {
        let key = key.context("Failed to read key")?;
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => {
                write!(out, "{}\r\n", "*".repeat(secret.chars().count()))?;
                out.flush()?;
                return Ok(SecretString::from(secret.as_str()));
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                write!(out, "\r\n")?;
                bail!("Password entry interrupted");
            }
            KeyCode::Char(c) => secret.push(c),
            KeyCode::Tab => secret.push('\t'),
            KeyCode::Backspace => secret.push('\u{8}'),
            _ => {}
        }
    }

    bail!("Input closed before Enter was pressed")
}

/// Key presses from the real terminal.
fn terminal_keys() -> impl Iterator<Item = io::Result<KeyEvent>> {
    std::iter::from_fn(|| loop {
        match event::read() {
            Ok(Event::Key(key)) => return Some(Ok(key)),
            Ok(_) => continue,
            Err(e) => return Some(Err(e)),
        }
    })
}

/// Prompt for the password on the controlling terminal.
pub fn prompt_password<W: Write>(out: &mut W, username: &str) -> Result<SecretString> {
    write!(out, "Password of '{username}': ")?;
    out.flush()?;

    let _raw_mode = RawModeGuard::new().context("Failed to enable raw terminal mode")?;
    read_masked(terminal_keys(), out)
}

/// Run the three prompts: host, username and password.
///
/// `host` and `username` skip their prompt when already known (from CLI
/// flags). A blank username answer falls back to [`DEFAULT_USERNAME`].
pub fn capture(host: Option<String>, username: Option<String>) -> Result<Credentials> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let host = match host {
        Some(host) => host,
        None => prompt_line(&mut input, &mut out, "Host:")?,
    };
    let username = match username {
        Some(username) => username,
        None => prompt_line(&mut input, &mut out, "Username (root):")?,
    };
    let username = match username.trim() {
        "" => DEFAULT_USERNAME.to_string(),
        name => name.to_string(),
    };

    let password = prompt_password(&mut out, &username)?;
    writeln!(out)?;

    Credentials::new(&host, &username, password)
}
