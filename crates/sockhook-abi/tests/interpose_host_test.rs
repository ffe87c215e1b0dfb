//! Host path with the entry points exported under their real names.
//!
//! Here `socket` and `shutdown` shadow the libc symbols, so the host
//! bindings must reach the system without going through them.

#![cfg(all(feature = "interpose", unix))]

use sockhook_abi::bindings::{self, Bindings};
use sockhook_abi::ws2_32_abi::{WSAGetLastError, WSASetLastError, closesocket, shutdown, socket};
use sockhook_abi::HookSession;
use sockhook_core::socket::{
    AF_INET, INVALID_SOCKET, IPPROTO_TCP, SD_BOTH, SOCK_RAW, SOCK_STREAM, SOCKET_ERROR,
};

const WSAEAFNOSUPPORT: i32 = 10047;
const WSAENOTCONN: i32 = 10057;

#[test]
fn host_calls_reach_the_system() {
    assert!(!HookSession::is_active());
    assert!(bindings::current().same_as(&Bindings::HOST));

    unsafe { WSASetLastError(0) };
    assert_eq!(unsafe { socket(4242, SOCK_STREAM, 0) }, INVALID_SOCKET);
    assert_eq!(unsafe { WSAGetLastError() }, WSAEAFNOSUPPORT);

    // Unprivileged raw sockets fail; either way the call returns.
    let raw = unsafe { socket(AF_INET, SOCK_RAW, IPPROTO_TCP) };
    if raw != INVALID_SOCKET {
        assert_eq!(unsafe { closesocket(raw) }, 0);
    }

    let sock = unsafe { socket(AF_INET, SOCK_STREAM, IPPROTO_TCP) };
    assert_ne!(sock, INVALID_SOCKET);
    assert_eq!(unsafe { shutdown(sock, SD_BOTH) }, SOCKET_ERROR);
    assert_eq!(unsafe { WSAGetLastError() }, WSAENOTCONN);
    assert_eq!(unsafe { closesocket(sock) }, 0);
}
