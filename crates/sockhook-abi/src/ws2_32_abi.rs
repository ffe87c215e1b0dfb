//! Public Winsock entry points.
//!
//! `socket`, `closesocket` and `shutdown` dispatch through the binding
//! table, so they reach the host or the simulator depending on whether a
//! hook session is installed. The last-error pair always works on the
//! calling thread's slot, which both backends write.

use std::ffi::c_int;

use crate::bindings::{self, SOCKET};
use crate::last_error_abi;

// ---------------------------------------------------------------------------
// socket
// ---------------------------------------------------------------------------

entry_point! {
    /// Create a socket.
    ///
    /// Returns `INVALID_SOCKET` on failure; see `WSAGetLastError`.
    fn socket(af: c_int, sock_type: c_int, protocol: c_int) -> SOCKET {
        let target = bindings::current().socket;
        unsafe { target(af, sock_type, protocol) }
    }
}

// ---------------------------------------------------------------------------
// closesocket
// ---------------------------------------------------------------------------

entry_point! {
    /// Close a socket. Returns 0, or `SOCKET_ERROR` on failure.
    fn closesocket(s: SOCKET) -> c_int {
        let target = bindings::current().closesocket;
        unsafe { target(s) }
    }
}

// ---------------------------------------------------------------------------
// shutdown
// ---------------------------------------------------------------------------

entry_point! {
    /// Disable sends, receives, or both. Returns 0, or `SOCKET_ERROR` on
    /// failure.
    fn shutdown(s: SOCKET, how: c_int) -> c_int {
        let target = bindings::current().shutdown;
        unsafe { target(s, how) }
    }
}

// ---------------------------------------------------------------------------
// WSAGetLastError / WSASetLastError
// ---------------------------------------------------------------------------

entry_point! {
    /// Error code of the calling thread's last failed socket call.
    #[allow(non_snake_case)]
    fn WSAGetLastError() -> c_int {
        last_error_abi::last_error()
    }
}

entry_point! {
    /// Overwrite the calling thread's last-error slot.
    #[allow(non_snake_case)]
    fn WSASetLastError(code: c_int) {
        last_error_abi::set_last_error(code);
    }
}
