//! Host passthrough: the bindings in place when no session is installed.
//!
//! On Unix targets these forward to the BSD socket calls, translating
//! Winsock argument values and `errno` results. Elsewhere the host layer is
//! unavailable and every call fails with `WSAEOPNOTSUPP`.
//!
//! `socket` and `shutdown` never go through the libc symbols of the same
//! name: under `interpose` those resolve back to our own entry points. Linux
//! issues the syscalls directly; other Unix targets look up the next
//! definition with `dlsym(RTLD_NEXT, ..)`.

use std::ffi::c_int;

#[cfg(unix)]
use sockhook_core::error::{WSAEINVAL, WSAENOBUFS, WSAENOTSOCK};
use sockhook_core::socket::{INVALID_SOCKET, SOCKET_ERROR};

use crate::bindings::SOCKET;
use crate::last_error_abi::set_last_error;

// Winsock codes that only the host path produces.
#[cfg(unix)]
mod wsa {
    use std::ffi::c_int;

    pub const WSAEINTR: c_int = 10004;
    pub const WSAEACCES: c_int = 10013;
    pub const WSAEMFILE: c_int = 10024;
    pub const WSAEPROTOTYPE: c_int = 10041;
    pub const WSAEPROTONOSUPPORT: c_int = 10043;
    pub const WSAESOCKTNOSUPPORT: c_int = 10044;
    pub const WSAEAFNOSUPPORT: c_int = 10047;
    pub const WSAENOTCONN: c_int = 10057;
}
#[cfg(unix)]
use wsa::*;

/// Map a POSIX errno to a Winsock error code.
///
/// Unknown values pass through unchanged.
#[cfg(unix)]
#[must_use]
pub fn errno_to_wsa(errno: c_int) -> c_int {
    match errno {
        libc::EINTR => WSAEINTR,
        libc::EACCES => WSAEACCES,
        libc::EMFILE | libc::ENFILE => WSAEMFILE,
        libc::EINVAL => WSAEINVAL,
        libc::EBADF | libc::ENOTSOCK => WSAENOTSOCK,
        libc::EPROTOTYPE => WSAEPROTOTYPE,
        libc::EPROTONOSUPPORT => WSAEPROTONOSUPPORT,
        libc::ESOCKTNOSUPPORT => WSAESOCKTNOSUPPORT,
        libc::EAFNOSUPPORT => WSAEAFNOSUPPORT,
        libc::ENOBUFS | libc::ENOMEM => WSAENOBUFS,
        libc::ENOTCONN => WSAENOTCONN,
        _ => errno,
    }
}

/// `errno` of the host call that just failed.
#[cfg(unix)]
fn last_errno() -> c_int {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(libc::EINVAL)
}

#[cfg(unix)]
fn check(rc: c_int) -> Result<c_int, c_int> {
    if rc < 0 { Err(last_errno()) } else { Ok(rc) }
}

/// Winsock and BSD disagree on some address family numbers.
#[cfg(unix)]
fn host_address_family(af: c_int) -> c_int {
    use sockhook_core::socket::{AF_INET, AF_INET6, AF_UNSPEC};
    match af {
        AF_UNSPEC => libc::AF_UNSPEC,
        AF_INET => libc::AF_INET,
        AF_INET6 => libc::AF_INET6,
        other => other,
    }
}

#[cfg(unix)]
fn host_fd(s: SOCKET) -> Option<c_int> {
    c_int::try_from(s).ok()
}

#[cfg(target_os = "linux")]
unsafe fn raw_socket(domain: c_int, sock_type: c_int, protocol: c_int) -> Result<c_int, c_int> {
    check(unsafe { libc::syscall(libc::SYS_socket, domain, sock_type, protocol) } as c_int)
}

#[cfg(target_os = "linux")]
unsafe fn raw_shutdown(fd: c_int, how: c_int) -> Result<c_int, c_int> {
    check(unsafe { libc::syscall(libc::SYS_shutdown, fd, how) } as c_int)
}

#[cfg(all(unix, not(target_os = "linux")))]
type HostSocketFn = unsafe extern "C" fn(c_int, c_int, c_int) -> c_int;
#[cfg(all(unix, not(target_os = "linux")))]
type HostShutdownFn = unsafe extern "C" fn(c_int, c_int) -> c_int;

/// Next definition of `name` after this object.
#[cfg(all(unix, not(target_os = "linux")))]
fn next_symbol(name: &std::ffi::CStr) -> Result<*mut libc::c_void, c_int> {
    // SAFETY: `name` is NUL-terminated and RTLD_NEXT is a valid handle.
    let ptr = unsafe { libc::dlsym(libc::RTLD_NEXT, name.as_ptr()) };
    if ptr.is_null() { Err(libc::ENOSYS) } else { Ok(ptr) }
}

#[cfg(all(unix, not(target_os = "linux")))]
unsafe fn raw_socket(domain: c_int, sock_type: c_int, protocol: c_int) -> Result<c_int, c_int> {
    // SAFETY: the host `socket` has this signature.
    let host_fn: HostSocketFn = unsafe { std::mem::transmute(next_symbol(c"socket")?) };
    check(unsafe { host_fn(domain, sock_type, protocol) })
}

#[cfg(all(unix, not(target_os = "linux")))]
unsafe fn raw_shutdown(fd: c_int, how: c_int) -> Result<c_int, c_int> {
    // SAFETY: the host `shutdown` has this signature.
    let host_fn: HostShutdownFn = unsafe { std::mem::transmute(next_symbol(c"shutdown")?) };
    check(unsafe { host_fn(fd, how) })
}

/// Host `socket`.
#[cfg(unix)]
pub unsafe extern "C" fn host_socket(af: c_int, sock_type: c_int, protocol: c_int) -> SOCKET {
    match unsafe { raw_socket(host_address_family(af), sock_type, protocol) } {
        Ok(fd) => fd as SOCKET,
        Err(errno) => {
            set_last_error(errno_to_wsa(errno));
            INVALID_SOCKET
        }
    }
}

/// Host `closesocket`.
#[cfg(unix)]
pub unsafe extern "C" fn host_closesocket(s: SOCKET) -> c_int {
    let Some(fd) = host_fd(s) else {
        set_last_error(WSAENOTSOCK);
        return SOCKET_ERROR;
    };
    match check(unsafe { libc::close(fd) }) {
        Ok(_) => 0,
        Err(errno) => {
            set_last_error(errno_to_wsa(errno));
            SOCKET_ERROR
        }
    }
}

/// Host `shutdown`. `SD_*` and `SHUT_*` share their values.
#[cfg(unix)]
pub unsafe extern "C" fn host_shutdown(s: SOCKET, how: c_int) -> c_int {
    let Some(fd) = host_fd(s) else {
        set_last_error(WSAENOTSOCK);
        return SOCKET_ERROR;
    };
    match unsafe { raw_shutdown(fd, how) } {
        Ok(_) => 0,
        Err(errno) => {
            set_last_error(errno_to_wsa(errno));
            SOCKET_ERROR
        }
    }
}

#[cfg(not(unix))]
pub unsafe extern "C" fn host_socket(_af: c_int, _sock_type: c_int, _protocol: c_int) -> SOCKET {
    set_last_error(sockhook_core::error::WSAEOPNOTSUPP);
    INVALID_SOCKET
}

#[cfg(not(unix))]
pub unsafe extern "C" fn host_closesocket(_s: SOCKET) -> c_int {
    set_last_error(sockhook_core::error::WSAEOPNOTSUPP);
    SOCKET_ERROR
}

#[cfg(not(unix))]
pub unsafe extern "C" fn host_shutdown(_s: SOCKET, _how: c_int) -> c_int {
    set_last_error(sockhook_core::error::WSAEOPNOTSUPP);
    SOCKET_ERROR
}
