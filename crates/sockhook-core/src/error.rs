//! Winsock error codes and the engine's failure taxonomy.

use thiserror::Error;

/// `ERROR_INVALID_PARAMETER`, reported by `socket` for unsupported types.
pub const WSA_INVALID_PARAMETER: i32 = 87;
/// An invalid argument was supplied.
pub const WSAEINVAL: i32 = 10022;
/// The descriptor is not a socket.
pub const WSAENOTSOCK: i32 = 10038;
/// No buffer space is available.
pub const WSAENOBUFS: i32 = 10055;
/// A successful `WSAStartup` call must occur first.
pub const WSANOTINITIALISED: i32 = 10093;
/// Operation not supported.
pub const WSAEOPNOTSUPP: i32 = 10045;

/// Failure classification for simulated socket calls.
///
/// Every variant is an ordinary protocol outcome, not a transient fault;
/// none of them is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SocketError {
    /// `socket` was asked for a transport the simulator does not provide.
    #[error("unsupported socket type")]
    InvalidParameter,
    /// The handle is not an open socket in the current session.
    #[error("handle is not a socket")]
    NotASocket,
    /// A mode argument (e.g. the shutdown `how`) was out of range.
    #[error("invalid argument")]
    InvalidArgument,
    /// The handle lane for the requested transport is exhausted.
    #[error("no handle space left for transport")]
    NoBufferSpace,
    /// No hook session is installed.
    #[error("socket layer not initialised")]
    NotInitialised,
}

impl SocketError {
    /// Winsock error code published through the last-error slot.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidParameter => WSA_INVALID_PARAMETER,
            Self::NotASocket => WSAENOTSOCK,
            Self::InvalidArgument => WSAEINVAL,
            Self::NoBufferSpace => WSAENOBUFS,
            Self::NotInitialised => WSANOTINITIALISED,
        }
    }
}
