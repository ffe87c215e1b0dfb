//! Per-socket lifecycle state.
//!
//! A socket is open while its entry sits in the registry. Shutdown only ever
//! adds directions to the mask; closing removes the entry outright.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::socket::{SD_BOTH, SD_RECEIVE, SD_SEND, SocketHandle};

/// Simulated transport of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Connection-oriented byte stream (TCP-like). Odd handles.
    Stream,
    /// Connectionless datagrams (UDP-like). Even handles.
    Datagram,
}

impl Transport {
    /// Low bit every handle of this transport carries.
    #[must_use]
    pub const fn parity(self) -> usize {
        match self {
            Self::Stream => 1,
            Self::Datagram => 0,
        }
    }

    /// First handle value issued for this transport in a fresh session.
    #[must_use]
    pub const fn first_handle(self) -> SocketHandle {
        match self {
            Self::Stream => 1,
            Self::Datagram => 2,
        }
    }
}

bitflags::bitflags! {
    /// Directions of a socket that have been shut down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShutdownMask: u8 {
        /// Receiving is disabled.
        const RECEIVE = 0b01;
        /// Sending is disabled.
        const SEND = 0b10;
        /// Both directions are disabled.
        const BOTH = Self::RECEIVE.bits() | Self::SEND.bits();
    }
}

/// A single `shutdown` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownDirection {
    /// `SD_RECEIVE`
    Receive,
    /// `SD_SEND`
    Send,
    /// `SD_BOTH`
    Both,
}

impl ShutdownDirection {
    /// Decode the `how` argument of `shutdown`.
    #[must_use]
    pub const fn from_how(how: i32) -> Option<Self> {
        match how {
            SD_RECEIVE => Some(Self::Receive),
            SD_SEND => Some(Self::Send),
            SD_BOTH => Some(Self::Both),
            _ => None,
        }
    }

    /// Directions this request disables.
    #[must_use]
    pub const fn mask(self) -> ShutdownMask {
        match self {
            Self::Receive => ShutdownMask::RECEIVE,
            Self::Send => ShutdownMask::SEND,
            Self::Both => ShutdownMask::BOTH,
        }
    }
}

/// State of one open simulated socket.
///
/// Fixtures hold these through `Arc` while the registry keeps mutating them,
/// so the shutdown mask lives in a single atomic word.
#[derive(Debug)]
pub struct SocketState {
    handle: SocketHandle,
    transport: Transport,
    shutdown: AtomicU8,
}

impl SocketState {
    pub(crate) fn new(handle: SocketHandle, transport: Transport) -> Self {
        Self {
            handle,
            transport,
            shutdown: AtomicU8::new(ShutdownMask::empty().bits()),
        }
    }

    #[must_use]
    pub fn handle(&self) -> SocketHandle {
        self.handle
    }

    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Directions shut down so far.
    #[must_use]
    pub fn shutdown_mask(&self) -> ShutdownMask {
        ShutdownMask::from_bits_truncate(self.shutdown.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn can_receive(&self) -> bool {
        !self.shutdown_mask().contains(ShutdownMask::RECEIVE)
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.shutdown_mask().contains(ShutdownMask::SEND)
    }

    /// Union `direction` into the mask and return the new mask.
    ///
    /// Repeating a direction is a no-op; the mask never shrinks.
    pub(crate) fn apply_shutdown(&self, direction: ShutdownDirection) -> ShutdownMask {
        let added = direction.mask().bits();
        let previous = self.shutdown.fetch_or(added, Ordering::AcqRel);
        ShutdownMask::from_bits_truncate(previous | added)
    }
}
