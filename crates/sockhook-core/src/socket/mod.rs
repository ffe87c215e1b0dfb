//! Windows Sockets constants and pure-logic validators.
//!
//! Values follow `<winsock2.h>`. The simulated entry points live in the ABI
//! crate; this module only classifies their arguments.

use crate::state::Transport;

/// Opaque socket handle (`SOCKET`, a `UINT_PTR` on Windows).
pub type SocketHandle = usize;

/// Handle value returned when socket creation fails.
pub const INVALID_SOCKET: SocketHandle = !0;
/// Return value of `closesocket`/`shutdown` on failure.
pub const SOCKET_ERROR: i32 = -1;

// ---------------------------------------------------------------------------
// Address families (AF_*)
// ---------------------------------------------------------------------------

/// Unspecified address family.
pub const AF_UNSPEC: i32 = 0;
/// IPv4 Internet protocols.
pub const AF_INET: i32 = 2;
/// IPv6 Internet protocols.
pub const AF_INET6: i32 = 23;

// ---------------------------------------------------------------------------
// Socket types (SOCK_*)
// ---------------------------------------------------------------------------

/// Byte-stream socket.
pub const SOCK_STREAM: i32 = 1;
/// Datagram socket.
pub const SOCK_DGRAM: i32 = 2;
/// Raw network protocol access.
pub const SOCK_RAW: i32 = 3;
/// Reliably delivered messages.
pub const SOCK_RDM: i32 = 4;
/// Sequenced, reliable, connection-based datagrams.
pub const SOCK_SEQPACKET: i32 = 5;

// ---------------------------------------------------------------------------
// Protocols (IPPROTO_*)
// ---------------------------------------------------------------------------

/// Let the provider pick the protocol.
pub const IPPROTO_IP: i32 = 0;
/// Transmission Control Protocol.
pub const IPPROTO_TCP: i32 = 6;
/// User Datagram Protocol.
pub const IPPROTO_UDP: i32 = 17;

// ---------------------------------------------------------------------------
// Shutdown modes (SD_*)
// ---------------------------------------------------------------------------

/// Shut down the receiving side.
pub const SD_RECEIVE: i32 = 0;
/// Shut down the sending side.
pub const SD_SEND: i32 = 1;
/// Shut down both sides.
pub const SD_BOTH: i32 = 2;

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Maps a requested socket type onto a simulated transport.
///
/// Only stream and datagram sockets are simulated; every other type
/// (raw, RDM, seqpacket, garbage) yields `None`.
#[inline]
#[must_use]
pub fn transport_for_type(sock_type: i32) -> Option<Transport> {
    match sock_type {
        SOCK_STREAM => Some(Transport::Stream),
        SOCK_DGRAM => Some(Transport::Datagram),
        _ => None,
    }
}

/// Returns `true` if `handle` has the parity reserved for `transport`.
#[inline]
#[must_use]
pub fn handle_matches_transport(handle: SocketHandle, transport: Transport) -> bool {
    handle != INVALID_SOCKET && handle % 2 == transport.parity()
}
