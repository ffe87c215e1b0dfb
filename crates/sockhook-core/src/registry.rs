//! Virtual socket registry.
//!
//! Maps synthetic handles to [`SocketState`]. Handles come from two
//! independent lanes, odd for streams and even for datagrams, each strictly
//! increasing by two. A closed handle is never handed out again by the same
//! registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::error::SocketError;
use crate::socket::{self, INVALID_SOCKET, SocketHandle};
use crate::state::{ShutdownDirection, ShutdownMask, SocketState, Transport};

/// Next handle of each lane. `None` once the lane has run off the end of
/// the handle space.
#[derive(Debug, Clone, Copy)]
struct Lanes {
    next_stream: Option<SocketHandle>,
    next_datagram: Option<SocketHandle>,
}

impl Default for Lanes {
    fn default() -> Self {
        Self {
            next_stream: Some(Transport::Stream.first_handle()),
            next_datagram: Some(Transport::Datagram.first_handle()),
        }
    }
}

impl Lanes {
    fn take(&mut self, transport: Transport) -> Option<SocketHandle> {
        let slot = match transport {
            Transport::Stream => &mut self.next_stream,
            Transport::Datagram => &mut self.next_datagram,
        };
        let handle = (*slot)?;
        // INVALID_SOCKET is odd: the stream lane stops just short of it.
        if handle == INVALID_SOCKET {
            return None;
        }
        debug_assert!(socket::handle_matches_transport(handle, transport));
        *slot = handle.checked_add(2);
        Some(handle)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    sockets: HashMap<SocketHandle, Arc<SocketState>>,
    lanes: Lanes,
}

/// Concurrent handle → socket state registry.
///
/// Mutators (`create`, `close`, `shutdown`) take the write lock, so at most
/// one runs at a time; lookups share the read lock.
#[derive(Debug, Default)]
pub struct SocketRegistry {
    inner: RwLock<RegistryInner>,
}

impl SocketRegistry {
    /// Create an empty registry with both lanes at their first handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a simulated socket.
    ///
    /// `af` and `protocol` are accepted as-is; only `sock_type` decides the
    /// transport. Unsupported types leave the registry untouched.
    pub fn create(
        &self,
        af: i32,
        sock_type: i32,
        protocol: i32,
    ) -> Result<SocketHandle, SocketError> {
        let Some(transport) = socket::transport_for_type(sock_type) else {
            trace!(af, sock_type, protocol, "rejecting unsupported socket type");
            return Err(SocketError::InvalidParameter);
        };

        let mut inner = self.inner.write();
        let Some(handle) = inner.lanes.take(transport) else {
            trace!(?transport, "handle lane exhausted");
            return Err(SocketError::NoBufferSpace);
        };
        inner
            .sockets
            .insert(handle, Arc::new(SocketState::new(handle, transport)));
        trace!(handle, ?transport, af, protocol, "socket opened");
        Ok(handle)
    }

    /// Close `handle`, whatever its shutdown state.
    pub fn close(&self, handle: SocketHandle) -> Result<(), SocketError> {
        match self.inner.write().sockets.remove(&handle) {
            Some(state) => {
                trace!(handle, transport = ?state.transport(), "socket closed");
                Ok(())
            }
            None => Err(SocketError::NotASocket),
        }
    }

    /// Shut down one or both directions of `handle`.
    ///
    /// The handle is checked before `how`, so a stale handle always reports
    /// `NotASocket`.
    pub fn shutdown(&self, handle: SocketHandle, how: i32) -> Result<ShutdownMask, SocketError> {
        let inner = self.inner.write();
        let state = inner.sockets.get(&handle).ok_or(SocketError::NotASocket)?;
        let direction = ShutdownDirection::from_how(how).ok_or(SocketError::InvalidArgument)?;
        let mask = state.apply_shutdown(direction);
        trace!(handle, ?direction, ?mask, "socket shut down");
        Ok(mask)
    }

    /// State of `handle` if it is open and of the expected transport.
    ///
    /// Asking for the wrong transport is not an error; it simply finds
    /// nothing.
    #[must_use]
    pub fn lookup_as(&self, handle: SocketHandle, transport: Transport) -> Option<Arc<SocketState>> {
        self.inner
            .read()
            .sockets
            .get(&handle)
            .filter(|state| state.transport() == transport)
            .cloned()
    }

    /// State of `handle` whatever its transport.
    #[must_use]
    pub fn lookup(&self, handle: SocketHandle) -> Option<Arc<SocketState>> {
        self.inner.read().sockets.get(&handle).cloned()
    }

    #[must_use]
    pub fn contains(&self, handle: SocketHandle) -> bool {
        self.inner.read().sockets.contains_key(&handle)
    }

    /// Handles still open, in ascending order.
    #[must_use]
    pub fn open_handles(&self) -> Vec<SocketHandle> {
        let mut handles: Vec<_> = self.inner.read().sockets.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().sockets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().sockets.is_empty()
    }

    #[cfg(test)]
    fn with_lanes(next_stream: SocketHandle, next_datagram: SocketHandle) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                sockets: HashMap::new(),
                lanes: Lanes {
                    next_stream: Some(next_stream),
                    next_datagram: Some(next_datagram),
                },
            }),
        }
    }
}
