//! # sockhook-core
//!
//! Safe, in-memory socket engine used by the `sockhook-abi` shim.
//!
//! Nothing in this crate touches a real network stack or file descriptor.
//! A [`SocketRegistry`] hands out synthetic Winsock handles whose low bit
//! encodes the transport (odd = stream, even = datagram), tracks their
//! shutdown state, and reports failures as [`SocketError`] values that the
//! ABI layer turns into `INVALID_SOCKET`/`SOCKET_ERROR` plus a last-error
//! code.
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod error;
pub mod registry;
pub mod socket;
pub mod state;

pub use error::SocketError;
pub use registry::SocketRegistry;
pub use socket::SocketHandle;
pub use state::{ShutdownDirection, ShutdownMask, SocketState, Transport};
