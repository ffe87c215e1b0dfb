//! Hook sessions: scoped redirection of the entry points to the simulator.
//!
//! A [`HookSession`] owns everything the redirection touches. Creating one
//! publishes a fresh [`SocketRegistry`] and then patches the binding table;
//! removing or dropping it restores the displaced bindings and only then
//! retires the registry, so no shim can ever observe a patched table without
//! a registry behind it.
//!
//! Only one session may be installed per process. [`HookSession::install`]
//! refuses a second one with [`HookError::AlreadyInstalled`];
//! [`HookSession::acquire`] waits for the current one to go away instead,
//! which is what parallel test runners want.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use sockhook_core::{SocketRegistry, SocketState, Transport};
use thiserror::Error;
use tracing::{debug, warn};

use crate::bindings::{self, Bindings, EntryPoint, SOCKET};
use crate::config::{HookConfig, LeakPolicy};
use crate::last_error_abi;

static ACTIVE_REGISTRY: RwLock<Option<Arc<SocketRegistry>>> = parking_lot::const_rwlock(None);

static SESSION_HELD: Mutex<bool> = parking_lot::const_mutex(false);
static SESSION_RELEASED: Condvar = Condvar::new();

/// Registry of the installed session, if any.
pub(crate) fn active_registry() -> Option<Arc<SocketRegistry>> {
    ACTIVE_REGISTRY.read().clone()
}

#[derive(Debug, Error)]
pub enum HookError {
    /// Another session currently owns the binding table.
    #[error("a hook session is already installed")]
    AlreadyInstalled,
    /// The session was removed with sockets still open under `LeakPolicy::Deny`.
    #[error("{} socket(s) still open at teardown: {handles:?}", .handles.len())]
    LeakedSockets { handles: Vec<SOCKET> },
}

/// What a session left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Handles still open when the session ended, ascending.
    pub open_handles: Vec<SOCKET>,
}

impl TeardownReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.open_handles.is_empty()
    }
}

/// An installed redirection of the socket entry points.
#[derive(Debug)]
pub struct HookSession {
    registry: Arc<SocketRegistry>,
    displaced: Bindings,
    config: HookConfig,
    installed: bool,
}

impl HookSession {
    /// Install with settings from the environment.
    pub fn install() -> Result<Self, HookError> {
        Self::install_with(HookConfig::default())
    }

    /// Install, failing if another session is active.
    pub fn install_with(config: HookConfig) -> Result<Self, HookError> {
        {
            let mut held = SESSION_HELD.lock();
            if *held {
                debug!("refusing second hook session");
                return Err(HookError::AlreadyInstalled);
            }
            *held = true;
        }
        Ok(Self::activate(config))
    }

    /// Install with settings from the environment, waiting for any active
    /// session to be removed first.
    #[must_use]
    pub fn acquire() -> Self {
        Self::acquire_with(HookConfig::default())
    }

    #[must_use]
    pub fn acquire_with(config: HookConfig) -> Self {
        {
            let mut held = SESSION_HELD.lock();
            while *held {
                SESSION_RELEASED.wait(&mut held);
            }
            *held = true;
        }
        Self::activate(config)
    }

    /// Caller must hold `SESSION_HELD`.
    fn activate(config: HookConfig) -> Self {
        let registry = Arc::new(SocketRegistry::new());
        *ACTIVE_REGISTRY.write() = Some(Arc::clone(&registry));
        let displaced = bindings::replace(Bindings::SIMULATED);
        last_error_abi::set_last_error(0);
        let patched: Vec<_> = Bindings::SIMULATED
            .differing(&displaced)
            .into_iter()
            .map(EntryPoint::symbol)
            .collect();
        debug!(
            ?patched,
            leak_policy = ?config.leak_policy,
            "hook session installed"
        );
        Self {
            registry,
            displaced,
            config,
            installed: true,
        }
    }

    /// Whether any session is installed in this process.
    #[must_use]
    pub fn is_active() -> bool {
        *SESSION_HELD.lock()
    }

    /// The session's registry.
    #[must_use]
    pub fn registry(&self) -> &SocketRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> HookConfig {
        self.config
    }

    /// Bindings this session replaced and will restore.
    #[must_use]
    pub fn displaced_bindings(&self) -> Bindings {
        self.displaced
    }

    /// State of an open stream socket; `None` for anything else.
    #[must_use]
    pub fn tcp_socket_state(&self, handle: SOCKET) -> Option<Arc<SocketState>> {
        self.registry.lookup_as(handle, Transport::Stream)
    }

    /// State of an open datagram socket; `None` for anything else.
    #[must_use]
    pub fn udp_socket_state(&self, handle: SOCKET) -> Option<Arc<SocketState>> {
        self.registry.lookup_as(handle, Transport::Datagram)
    }

    #[must_use]
    pub fn open_handles(&self) -> Vec<SOCKET> {
        self.registry.open_handles()
    }

    /// Restore the original bindings and discard the registry.
    ///
    /// Open sockets are listed in the report. Under `LeakPolicy::Deny` they
    /// turn into an error instead; the bindings are restored either way.
    pub fn remove(mut self) -> Result<TeardownReport, HookError> {
        let report = self.teardown();
        if self.config.leak_policy == LeakPolicy::Deny && !report.is_clean() {
            return Err(HookError::LeakedSockets {
                handles: report.open_handles,
            });
        }
        Ok(report)
    }

    fn teardown(&mut self) -> TeardownReport {
        bindings::replace(self.displaced);
        ACTIVE_REGISTRY.write().take();
        self.installed = false;

        let report = TeardownReport {
            open_handles: self.registry.open_handles(),
        };
        if !report.is_clean() && self.config.leak_policy.logs() {
            warn!(
                count = report.open_handles.len(),
                handles = ?report.open_handles,
                "sockets still open at hook teardown"
            );
        }
        debug!("hook session removed");

        *SESSION_HELD.lock() = false;
        SESSION_RELEASED.notify_one();
        report
    }
}

impl Drop for HookSession {
    fn drop(&mut self) {
        if self.installed {
            self.teardown();
        }
    }
}
