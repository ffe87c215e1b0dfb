//! Hook session configuration.
//!
//! The default leak policy comes from the `SOCKHOOK_LEAK_POLICY` environment
//! variable:
//! - `warn` (default): sockets still open when a session is removed are
//!   logged at `warn` and listed in the teardown report.
//! - `ignore`: they are listed in the report but not logged.
//! - `deny`: `HookSession::remove` reports them as an error. Teardown still
//!   completes.

use std::sync::atomic::{AtomicU8, Ordering};

/// What to do about sockets left open at session teardown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeakPolicy {
    /// Report silently.
    Ignore,
    /// Log at `warn` and report.
    #[default]
    Warn,
    /// Fail `remove` with `HookError::LeakedSockets`.
    Deny,
}

impl LeakPolicy {
    /// Parse from string (case-insensitive). Unknown values mean `Warn`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" | "off" | "none" => Self::Ignore,
            "deny" | "strict" | "fail" | "error" => Self::Deny,
            _ => Self::Warn,
        }
    }

    /// Whether leaked sockets are logged.
    #[must_use]
    pub const fn logs(self) -> bool {
        !matches!(self, Self::Ignore)
    }
}

// Atomic cache: 0=unresolved, 1=Ignore, 2=Warn, 3=Deny.
static CACHED_POLICY: AtomicU8 = AtomicU8::new(0);

const POLICY_UNRESOLVED: u8 = 0;
const POLICY_IGNORE: u8 = 1;
const POLICY_WARN: u8 = 2;
const POLICY_DENY: u8 = 3;

fn policy_to_u8(policy: LeakPolicy) -> u8 {
    match policy {
        LeakPolicy::Ignore => POLICY_IGNORE,
        LeakPolicy::Warn => POLICY_WARN,
        LeakPolicy::Deny => POLICY_DENY,
    }
}

fn u8_to_policy(v: u8) -> Option<LeakPolicy> {
    match v {
        POLICY_IGNORE => Some(LeakPolicy::Ignore),
        POLICY_WARN => Some(LeakPolicy::Warn),
        POLICY_DENY => Some(LeakPolicy::Deny),
        _ => None,
    }
}

fn policy_from_env() -> LeakPolicy {
    std::env::var("SOCKHOOK_LEAK_POLICY")
        .map(|v| LeakPolicy::from_str_loose(&v))
        .unwrap_or_default()
}

/// Configured leak policy (reads the environment on first call, caches
/// thereafter).
///
/// Threads racing the first call each read the environment; they all see
/// the configured value.
#[must_use]
pub fn leak_policy() -> LeakPolicy {
    if let Some(policy) = u8_to_policy(CACHED_POLICY.load(Ordering::Acquire)) {
        return policy;
    }
    let policy = policy_from_env();
    CACHED_POLICY.store(policy_to_u8(policy), Ordering::Release);
    policy
}

/// Per-session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookConfig {
    pub leak_policy: LeakPolicy,
}

impl Default for HookConfig {
    /// Settings taken from the environment.
    fn default() -> Self {
        Self {
            leak_policy: leak_policy(),
        }
    }
}

impl HookConfig {
    #[must_use]
    pub fn with_leak_policy(mut self, leak_policy: LeakPolicy) -> Self {
        self.leak_policy = leak_policy;
        self
    }
}
