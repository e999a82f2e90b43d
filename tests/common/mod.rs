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

//! Scripted stand-in for an SSH session.

#![allow(dead_code)]

use async_trait::async_trait;
use esxup::esxi::RemoteShell;
use esxup::ssh::tokio_client::{CommandExecutedResult, Error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum Reply {
    Output(String, String, u32),
    Fail(fn() -> Error),
}

/// Answers commands by prefix, records every command, counts closes.
#[derive(Default)]
pub struct MockShell {
    replies: Vec<(&'static str, Reply)>,
    commands: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_close: bool,
}

pub const FIREWALL_LIST: &str = "esxcli network firewall ruleset list";
pub const FIREWALL_SET: &str = "esxcli network firewall ruleset set";
pub const VERSION: &str = "vmware -v";
pub const PROFILE_LIST: &str = "esxcli software sources profile list";
pub const PROFILE_UPDATE: &str = "esxcli software profile update";

impl MockShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, prefix: &'static str, stdout: &str) -> Self {
        self.replies
            .push((prefix, Reply::Output(stdout.to_string(), String::new(), 0)));
        self
    }

    pub fn reply_with_stderr(self, prefix: &'static str, stdout: &str, stderr: &str) -> Self {
        self.reply_with_status(prefix, stdout, stderr, 0)
    }

    pub fn reply_with_status(
        mut self,
        prefix: &'static str,
        stdout: &str,
        stderr: &str,
        exit_status: u32,
    ) -> Self {
        self.replies.push((
            prefix,
            Reply::Output(stdout.to_string(), stderr.to_string(), exit_status),
        ));
        self
    }

    pub fn fail(mut self, prefix: &'static str, error: fn() -> Error) -> Self {
        self.replies.push((prefix, Reply::Fail(error)));
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn ran(&self, prefix: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteShell for MockShell {
    async fn run(&self, command: &str) -> Result<CommandExecutedResult, Error> {
        assert_eq!(self.closes(), 0, "command issued after close: {command}");
        self.commands.lock().unwrap().push(command.to_string());

        match self
            .replies
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix))
            .map(|(_, reply)| reply)
        {
            Some(Reply::Fail(error)) => Err(error()),
            Some(Reply::Output(stdout, stderr, exit_status)) => Ok(CommandExecutedResult {
                stdout: stdout.clone(),
                stderr: stderr.clone(),
                exit_status: *exit_status,
            }),
            None => Ok(CommandExecutedResult {
                stdout: String::new(),
                stderr: String::new(),
                exit_status: 0,
            }),
        }
    }

    async fn close(&self) -> Result<(), Error> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            )));
        }
        Ok(())
    }
}
