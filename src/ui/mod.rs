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

pub mod terminal_guard;

pub use terminal_guard::RawModeGuard;

use owo_colors::OwoColorize;

use crate::commands::update::UpdateOutcome;

/// Colouring for the few lines `main` prints around the update run.
pub struct OutputFormatter;

impl OutputFormatter {
    /// One-line summary of how the run ended.
    pub fn format_outcome(outcome: &UpdateOutcome) -> String {
        match outcome {
            UpdateOutcome::UpToDate { profile } => {
                format!("{} {}", "●".green(), format!("Up to date ({profile})").green())
            }
            UpdateOutcome::Updated {
                profile,
                exit_status: 0,
            } => format!("{} {}", "●".cyan(), format!("Update to {profile} issued").cyan()),
            UpdateOutcome::Updated {
                profile,
                exit_status,
            } => format!(
                "{} {}",
                "●".red(),
                format!("Update to {profile} failed (exit status {exit_status})").red()
            ),
            UpdateOutcome::VersionUnavailable => format!(
                "{} {}",
                "●".yellow(),
                "Installed version unavailable, nothing done".yellow()
            ),
            UpdateOutcome::NoQualifyingProfile => format!(
                "{} {}",
                "●".yellow(),
                "No qualifying profile, nothing done".yellow()
            ),
        }
    }

    /// The caught error, with its full context chain.
    pub fn format_error(error: &anyhow::Error) -> String {
        let mut output = format!("{} {}", "●".red(), "Error".red().bold());
        for line in format!("{error:#}").lines() {
            output.push_str(&format!("\n  {}", line.red()));
        }
        output
    }
}
