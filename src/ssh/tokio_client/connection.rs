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

//! SSH connection management and establishment.
//!
//! This module handles the low-level SSH connection establishment,
//! including address resolution, connection attempts, and initial handshake.

use russh::client::{Config, Handle, Handler};
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::{fmt::Debug, io};

use super::authentication::{AuthMethod, ServerCheckMethod};
use super::ToSocketAddrsWithHostname;

/// A ssh connection to a remote server.
///
/// After creating a `Client` by [`connect`]ing to a remote host,
/// use [`execute`] to send commands and receive results through the connection.
///
/// [`connect`]: Client::connect
/// [`execute`]: Client::execute
///
/// # Examples
///
/// ```no_run
/// use esxup::ssh::tokio_client::{AuthMethod, Client, ServerCheckMethod};
/// #[tokio::main]
/// async fn main() -> Result<(), esxup::ssh::tokio_client::Error> {
///     let client = Client::connect(
///         ("10.10.10.2", 22),
///         "root",
///         AuthMethod::password_with_fallback("root"),
///         ServerCheckMethod::NoCheck,
///     ).await?;
///
///     let result = client.execute("vmware -v").await?;
///     assert_eq!(result.exit_status, 0);
///
///     client.disconnect().await
/// }
/// ```
pub struct Client {
    pub(super) connection_handle: Handle<ClientHandler>,
    pub(super) username: String,
    pub(super) address: SocketAddr,
}

impl Client {
    /// Open a ssh connection to a remote host.
    ///
    /// `addr` is an address of the remote host. Anything which implements
    /// [`ToSocketAddrsWithHostname`] can be supplied.
    ///
    /// If `addr` yields multiple addresses, `connect` will be attempted with
    /// each of the addresses until a connection is successful.
    /// Authentification is tried on the first successful connection, walking
    /// `auth` in order, and the whole process aborted if every method fails.
    pub async fn connect(
        addr: impl ToSocketAddrsWithHostname,
        username: &str,
        auth: Vec<AuthMethod>,
        server_check: ServerCheckMethod,
    ) -> Result<Self, super::Error> {
        let config = Arc::new(Config::default());

        // Connection code inspired from std::net::TcpStream::connect and std::net::each_addr
        let socket_addrs = addr
            .to_socket_addrs()
            .map_err(super::Error::AddressInvalid)?;
        let mut connect_res = Err(super::Error::AddressInvalid(io::Error::new(
            io::ErrorKind::InvalidInput,
            "could not resolve to any addresses",
        )));
        for socket_addr in socket_addrs {
            tracing::debug!("Connecting to {}", socket_addr);
            let handler = ClientHandler {
                hostname: addr.hostname(),
                host: socket_addr,
                server_check: server_check.clone(),
            };
            match russh::client::connect(config.clone(), socket_addr, handler).await {
                Ok(h) => {
                    connect_res = Ok((socket_addr, h));
                    break;
                }
                Err(e) => {
                    tracing::debug!("Connection to {} failed: {}", socket_addr, e);
                    connect_res = Err(e);
                }
            }
        }
        let (address, mut handle) = connect_res?;
        let username = username.to_string();

        super::authentication::authenticate(&mut handle, &username, &auth).await?;

        Ok(Self {
            connection_handle: handle,
            username,
            address,
        })
    }

    /// Disconnect from the remote host.
    pub async fn disconnect(&self) -> Result<(), super::Error> {
        self.connection_handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await
            .map_err(super::Error::SshError)
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("username", &self.username)
            .field("address", &self.address)
            .field("connection_handle", &"Handle<ClientHandler>")
            .finish()
    }
}

/// SSH client handler for managing server key verification.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    hostname: String,
    host: SocketAddr,
    server_check: ServerCheckMethod,
}

impl Handler for ClientHandler {
    type Error = super::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        let accept_unknown = match &self.server_check {
            ServerCheckMethod::NoCheck => return Ok(true),
            ServerCheckMethod::DefaultKnownHostsFile => false,
            ServerCheckMethod::AcceptNewDefaultKnownHostsFile => true,
        };

        let checked =
            russh::keys::check_known_hosts(&self.hostname, self.host.port(), server_public_key);
        host_key_verdict(&self.hostname, checked, accept_unknown)
    }
}

/// Turn a known_hosts lookup into an accept/reject decision.
///
/// The lookup yields `Ok(true)` for a matching entry, `Ok(false)` when the
/// host has no entry and an error when the recorded key differs or the file
/// cannot be read. Only a missing entry is negotiable.
fn host_key_verdict<E: Display>(
    hostname: &str,
    checked: Result<bool, E>,
    accept_unknown: bool,
) -> Result<bool, super::Error> {
    match checked {
        Ok(true) => Ok(true),
        Ok(false) if accept_unknown => {
            tracing::warn!(
                "{} is not in known_hosts; accepting its key without recording it",
                hostname
            );
            Ok(true)
        }
        Ok(false) => {
            tracing::error!("{} is not in known_hosts", hostname);
            Ok(false)
        }
        Err(e) => {
            tracing::error!("Host key check for {} failed: {}", hostname, e);
            Err(super::Error::ServerCheckFailed)
        }
    }
}
