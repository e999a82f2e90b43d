//! This module is an internalized version of async-ssh2-tokio library,
//! cut down to what a single interactive session needs. Powered by the
//! rust ssh implementation russh.
//!
//! The heart of this module is [`Client`]. Use this for connection, authentication and execution.
//!
//! # Features
//! * Connect to a SSH Host via hostname or IP
//! * Password authentication with keyboard-interactive fallback
//! * Execute commands and collect stdout, stderr and exit code

pub mod authentication;
pub mod channel_manager;
pub mod connection;
pub mod error;
mod to_socket_addrs_with_hostname;

pub use authentication::{AuthKeyboardInteractive, AuthMethod, ServerCheckMethod};
pub use channel_manager::CommandExecutedResult;
pub use connection::{Client, ClientHandler};
pub use error::Error;
pub use to_socket_addrs_with_hostname::ToSocketAddrsWithHostname;
