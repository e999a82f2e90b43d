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

use async_trait::async_trait;

use crate::ssh::tokio_client::{Client, CommandExecutedResult, Error};

/// A remote command runner bound to one authenticated session.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Run one command line and wait for it to finish.
    async fn run(&self, command: &str) -> Result<CommandExecutedResult, Error>;

    /// Tear the session down.
    async fn close(&self) -> Result<(), Error>;
}

#[async_trait]
impl RemoteShell for Client {
    async fn run(&self, command: &str) -> Result<CommandExecutedResult, Error> {
        self.execute(command).await
    }

    async fn close(&self) -> Result<(), Error> {
        self.disconnect().await
    }
}
