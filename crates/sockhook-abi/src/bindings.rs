//! Process-wide binding table for the hooked entry points.
//!
//! Each hookable entry point reads its live target from this table on every
//! call, the way an imported function goes through its import-table slot.
//! Only [`crate::hook::HookSession`] swaps the table.

use std::ffi::c_int;

use parking_lot::RwLock;
use sockhook_core::SocketHandle;

use crate::{host_abi, sim_abi};

/// Winsock `SOCKET`.
#[allow(non_camel_case_types)]
pub type SOCKET = SocketHandle;

/// `SOCKET socket(int af, int type, int protocol)`
pub type SocketFn = unsafe extern "C" fn(c_int, c_int, c_int) -> SOCKET;
/// `int closesocket(SOCKET s)`
pub type CloseSocketFn = unsafe extern "C" fn(SOCKET) -> c_int;
/// `int shutdown(SOCKET s, int how)`
pub type ShutdownFn = unsafe extern "C" fn(SOCKET, c_int) -> c_int;

/// A hookable entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Socket,
    CloseSocket,
    Shutdown,
}

impl EntryPoint {
    pub const ALL: [Self; 3] = [Self::Socket, Self::CloseSocket, Self::Shutdown];

    /// Exported symbol name.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Socket => "socket",
            Self::CloseSocket => "closesocket",
            Self::Shutdown => "shutdown",
        }
    }
}

/// One complete set of targets for the hookable entry points.
#[derive(Debug, Clone, Copy)]
pub struct Bindings {
    pub socket: SocketFn,
    pub closesocket: CloseSocketFn,
    pub shutdown: ShutdownFn,
}

impl Bindings {
    /// Targets installed at process start: the host's own socket layer.
    pub const HOST: Self = Self {
        socket: host_abi::host_socket,
        closesocket: host_abi::host_closesocket,
        shutdown: host_abi::host_shutdown,
    };

    /// Targets installed by a hook session.
    pub const SIMULATED: Self = Self {
        socket: sim_abi::sim_socket,
        closesocket: sim_abi::sim_closesocket,
        shutdown: sim_abi::sim_shutdown,
    };

    /// Whether `self` targets exactly the same functions as `other`.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.differing(other).is_empty()
    }

    /// Entry points whose targets differ between `self` and `other`.
    #[must_use]
    pub fn differing(&self, other: &Self) -> Vec<EntryPoint> {
        EntryPoint::ALL
            .into_iter()
            .filter(|entry| !self.targets_equal(other, *entry))
            .collect()
    }

    fn targets_equal(&self, other: &Self, entry: EntryPoint) -> bool {
        match entry {
            EntryPoint::Socket => std::ptr::fn_addr_eq(self.socket, other.socket),
            EntryPoint::CloseSocket => std::ptr::fn_addr_eq(self.closesocket, other.closesocket),
            EntryPoint::Shutdown => std::ptr::fn_addr_eq(self.shutdown, other.shutdown),
        }
    }
}

static BINDINGS: RwLock<Bindings> = parking_lot::const_rwlock(Bindings::HOST);

/// Snapshot of the live bindings.
#[must_use]
pub fn current() -> Bindings {
    *BINDINGS.read()
}

/// Swap in `next` and return the bindings it displaced.
pub(crate) fn replace(next: Bindings) -> Bindings {
    std::mem::replace(&mut *BINDINGS.write(), next)
}
