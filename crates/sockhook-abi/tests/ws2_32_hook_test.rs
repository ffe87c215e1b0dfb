//! Winsock entry points driven through an installed hook session.
//!
//! Every test installs its own session (waiting for any other test's session
//! to finish) and removes it at the end, so handle numbering and the registry
//! start fresh each time.

use sockhook_abi::ws2_32_abi::{WSAGetLastError, WSASetLastError, closesocket, shutdown, socket};
use sockhook_abi::{HookConfig, HookSession, LeakPolicy, SOCKET};
use sockhook_core::error::{WSA_INVALID_PARAMETER, WSAEINVAL, WSAENOTSOCK};
use sockhook_core::socket::{
    AF_INET, AF_INET6, INVALID_SOCKET, IPPROTO_TCP, IPPROTO_UDP, SD_BOTH, SD_RECEIVE, SD_SEND,
    SOCK_DGRAM, SOCK_RAW, SOCK_SEQPACKET, SOCK_STREAM, SOCKET_ERROR,
};
use sockhook_core::{ShutdownMask, Transport};

fn set_up() -> HookSession {
    HookSession::acquire_with(HookConfig::default().with_leak_policy(LeakPolicy::Ignore))
}

fn tcp_socket() -> SOCKET {
    unsafe { socket(AF_INET, SOCK_STREAM, IPPROTO_TCP) }
}

fn udp_socket() -> SOCKET {
    unsafe { socket(AF_INET, SOCK_DGRAM, IPPROTO_UDP) }
}

#[test]
fn socket_tcp() {
    let sut = set_up();

    let sock = tcp_socket();

    assert_ne!(sock, 0);
    assert_ne!(sock % 2, 0);
    assert!(sut.tcp_socket_state(sock).is_some());
    sut.remove().unwrap();
}

#[test]
fn socket_udp() {
    let sut = set_up();

    let sock = udp_socket();

    assert_ne!(sock, 0);
    assert_eq!(sock % 2, 0);
    assert!(sut.udp_socket_state(sock).is_some());
    sut.remove().unwrap();
}

#[test]
fn socket_raw() {
    let sut = set_up();

    let sock = unsafe { socket(AF_INET, SOCK_RAW, IPPROTO_TCP) };

    assert_eq!(sock, INVALID_SOCKET);
    assert_eq!(sock as isize, -1);
    assert_eq!(unsafe { WSAGetLastError() }, WSA_INVALID_PARAMETER);
    assert!(sut.tcp_socket_state(sock).is_none());
    assert!(sut.udp_socket_state(sock).is_none());
    assert!(sut.registry().is_empty());
    sut.remove().unwrap();
}

#[test]
fn socket_other_unsupported_types() {
    let sut = set_up();

    for sock_type in [SOCK_SEQPACKET, 0, -1, 42] {
        unsafe { WSASetLastError(0) };
        assert_eq!(unsafe { socket(AF_INET, sock_type, 0) }, INVALID_SOCKET);
        assert_eq!(unsafe { WSAGetLastError() }, WSA_INVALID_PARAMETER);
    }
    assert!(sut.registry().is_empty());
    sut.remove().unwrap();
}

#[test]
fn closesocket_tcp() {
    let sut = set_up();
    let sock = tcp_socket();

    let result = unsafe { closesocket(sock) };

    assert_eq!(result, 0);
    assert!(sut.tcp_socket_state(sock).is_none());
    sut.remove().unwrap();
}

#[test]
fn closesocket_udp() {
    let sut = set_up();
    let sock = udp_socket();

    let result = unsafe { closesocket(sock) };

    assert_eq!(result, 0);
    assert!(sut.udp_socket_state(sock).is_none());
    sut.remove().unwrap();
}

#[test]
fn closesocket_twice() {
    let sut = set_up();
    let sock = tcp_socket();

    assert_eq!(unsafe { closesocket(sock) }, 0);
    assert_eq!(unsafe { closesocket(sock) }, SOCKET_ERROR);
    assert_eq!(unsafe { WSAGetLastError() }, WSAENOTSOCK);
    sut.remove().unwrap();
}

#[test]
fn closesocket_no_socket() {
    let sut = set_up();

    let result = unsafe { closesocket(12345) };

    assert_eq!(result, -1);
    assert_eq!(unsafe { WSAGetLastError() }, WSAENOTSOCK);
    sut.remove().unwrap();
}

#[test]
fn shutdown_accumulates() {
    let sut = set_up();
    let sock = udp_socket();

    assert_eq!(unsafe { shutdown(sock, SD_RECEIVE) }, 0);
    assert_eq!(unsafe { shutdown(sock, SD_SEND) }, 0);
    assert_eq!(unsafe { shutdown(sock, SD_BOTH) }, 0);

    let state = sut.udp_socket_state(sock).unwrap();
    assert_eq!(state.shutdown_mask(), ShutdownMask::BOTH);
    sut.remove().unwrap();
}

#[test]
fn shutdown_no_socket() {
    let sut = set_up();

    let result = unsafe { shutdown(321, SD_BOTH) };

    assert_eq!(result, -1);
    assert_eq!(unsafe { WSAGetLastError() }, WSAENOTSOCK);
    sut.remove().unwrap();
}

#[test]
fn shutdown_bad_mode() {
    let sut = set_up();
    let sock = tcp_socket();

    assert_eq!(unsafe { shutdown(sock, 7) }, SOCKET_ERROR);
    assert_eq!(unsafe { WSAGetLastError() }, WSAEINVAL);
    let state = sut.tcp_socket_state(sock).unwrap();
    assert_eq!(state.shutdown_mask(), ShutdownMask::empty());
    sut.remove().unwrap();
}

#[test]
fn closesocket_after_shutdown() {
    let sut = set_up();
    let sock = tcp_socket();

    assert_eq!(unsafe { shutdown(sock, SD_BOTH) }, 0);
    assert_eq!(unsafe { closesocket(sock) }, 0);
    assert!(sut.registry().is_empty());
    sut.remove().unwrap();
}

#[test]
fn success_does_not_clear_last_error() {
    let sut = set_up();

    assert_eq!(unsafe { closesocket(12345) }, SOCKET_ERROR);
    let sock = tcp_socket();
    assert_eq!(unsafe { closesocket(sock) }, 0);
    assert_eq!(unsafe { WSAGetLastError() }, WSAENOTSOCK);
    sut.remove().unwrap();
}

#[test]
fn last_error_is_per_thread() {
    let sut = set_up();

    let from_worker = std::thread::spawn(|| {
        let rc = unsafe { closesocket(999) };
        (rc, unsafe { WSAGetLastError() })
    })
    .join()
    .unwrap();

    assert_eq!(from_worker, (SOCKET_ERROR, WSAENOTSOCK));
    // Installing reset this thread's slot and nothing failed here since.
    assert_eq!(unsafe { WSAGetLastError() }, 0);
    sut.remove().unwrap();
}

#[test]
fn interleaved_creation_keeps_lanes_apart() {
    let sut = set_up();

    let handles = [
        tcp_socket(),
        udp_socket(),
        tcp_socket(),
        unsafe { socket(AF_INET6, SOCK_DGRAM, IPPROTO_UDP) },
        tcp_socket(),
    ];

    assert_eq!(handles, [1, 2, 3, 4, 5]);
    for handle in handles {
        let state = sut.registry().lookup(handle).unwrap();
        let expected = if handle % 2 == 1 {
            Transport::Stream
        } else {
            Transport::Datagram
        };
        assert_eq!(state.transport(), expected);
    }
    sut.remove().unwrap();
}

#[test]
fn closed_handle_is_not_reissued() {
    let sut = set_up();

    let first = udp_socket();
    assert_eq!(unsafe { closesocket(first) }, 0);
    let second = udp_socket();

    assert_ne!(first, second);
    assert_eq!(sut.open_handles(), vec![second]);
    sut.remove().unwrap();
}

#[test]
fn sockets_from_many_threads() {
    let sut = set_up();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                (0..32)
                    .map(|_| (tcp_socket(), udp_socket()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut all = Vec::new();
    for worker in workers {
        for (stream, datagram) in worker.join().unwrap() {
            assert_eq!(stream % 2, 1);
            assert_eq!(datagram % 2, 0);
            all.extend([stream, datagram]);
        }
    }
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 4 * 32 * 2);
    assert_eq!(sut.open_handles(), all);
    sut.remove().unwrap();
}

#[test]
fn teardown_reports_open_handles() {
    let sut = set_up();
    let stream = tcp_socket();
    let datagram = udp_socket();
    let closed = tcp_socket();
    assert_eq!(unsafe { closesocket(closed) }, 0);

    let report = sut.remove().unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.open_handles, vec![stream, datagram]);
}
