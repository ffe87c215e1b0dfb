//! Simulated targets installed by a hook session.
//!
//! Each shim adapts the Winsock calling convention onto the active
//! [`SocketRegistry`]: arguments in, `Result` back, and failures folded into
//! the real API's sentinel return plus the thread's last-error slot.

use std::ffi::c_int;
use std::sync::Arc;

use sockhook_core::socket::{INVALID_SOCKET, SOCKET_ERROR};
use sockhook_core::{SocketError, SocketRegistry};

use crate::bindings::SOCKET;
use crate::hook;
use crate::last_error_abi::set_last_error;

/// Run `op` against the active registry.
///
/// A shim that outlives its session (a call racing `remove`) finds no
/// registry and reports `WSANOTINITIALISED`.
fn with_registry<T>(
    op: impl FnOnce(&SocketRegistry) -> Result<T, SocketError>,
) -> Result<T, SocketError> {
    run_against(hook::active_registry(), op)
}

fn run_against<T>(
    registry: Option<Arc<SocketRegistry>>,
    op: impl FnOnce(&SocketRegistry) -> Result<T, SocketError>,
) -> Result<T, SocketError> {
    let registry = registry.ok_or(SocketError::NotInitialised)?;
    op(&registry)
}

#[inline]
fn fail<T>(err: SocketError, ret: T) -> T {
    set_last_error(err.code());
    ret
}

/// Simulated `socket`.
pub extern "C" fn sim_socket(af: c_int, sock_type: c_int, protocol: c_int) -> SOCKET {
    match with_registry(|registry| registry.create(af, sock_type, protocol)) {
        Ok(handle) => handle,
        Err(err) => fail(err, INVALID_SOCKET),
    }
}

/// Simulated `closesocket`.
pub extern "C" fn sim_closesocket(s: SOCKET) -> c_int {
    match with_registry(|registry| registry.close(s)) {
        Ok(()) => 0,
        Err(err) => fail(err, SOCKET_ERROR),
    }
}

/// Simulated `shutdown`.
pub extern "C" fn sim_shutdown(s: SOCKET, how: c_int) -> c_int {
    match with_registry(|registry| registry.shutdown(s, how)) {
        Ok(_) => 0,
        Err(err) => fail(err, SOCKET_ERROR),
    }
}
