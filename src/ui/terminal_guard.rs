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

//! RAII guard for terminal raw mode.
//!
//! Raw mode is needed to read the password one keypress at a time without
//! echo. The guard restores the terminal when dropped, so an early return
//! or a panic in the middle of the prompt does not leave the shell broken.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};
use tracing::error;

/// Disables raw mode when dropped.
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    /// Enable raw mode and return a guard
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { enabled: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            if let Err(e) = disable_raw_mode() {
                // We can't panic in drop, so just log the error
                error!("Failed to disable raw mode: {}", e);
                let _ = writeln!(io::stderr(), "\r\nWarning: Failed to restore terminal mode");
            } else {
                self.enabled = false;
            }
        }
    }
}
