#![allow(clippy::missing_safety_doc)]
//! # sockhook-abi
//!
//! Winsock-compatible `extern "C"` boundary for sockhook.
//!
//! The public entry points in [`ws2_32_abi`] have the exact signatures of
//! `socket`, `closesocket`, `shutdown`, `WSAGetLastError` and
//! `WSASetLastError`. The socket calls dispatch through a process-wide
//! binding table. Outside a [`HookSession`] the table points at the host
//! passthrough; while a session is installed it points at the simulated
//! shims, which run entirely against an in-memory registry.
//!
//! # Architecture
//!
//! ```text
//! caller -> ws2_32_abi entry -> binding table -> sim_abi shim -> SocketRegistry
//!                                             \-> host_abi passthrough (no session)
//! ```
//!
//! Failures never unwind across the boundary: they come back as
//! `INVALID_SOCKET`/`SOCKET_ERROR` with the code in the thread's last-error
//! slot.

#[macro_use]
mod macros;

pub mod bindings;
pub mod config;
pub mod hook;
pub mod host_abi;
pub mod last_error_abi;
pub mod sim_abi;
pub mod ws2_32_abi;

pub use bindings::{Bindings, EntryPoint, SOCKET};
pub use config::{HookConfig, LeakPolicy};
pub use hook::{HookError, HookSession, TeardownReport};
