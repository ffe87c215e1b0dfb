//! Thread-local Winsock last-error slot.
//!
//! Written only on failure paths. Reading does not clear it, and a later
//! success leaves an earlier failure code in place.

use std::cell::Cell;
use std::ffi::c_int;

thread_local! {
    static LAST_ERROR: Cell<c_int> = const { Cell::new(0) };
}

/// Last error recorded on the calling thread.
#[must_use]
pub fn last_error() -> c_int {
    LAST_ERROR.with(Cell::get)
}

pub(crate) fn set_last_error(code: c_int) {
    LAST_ERROR.with(|slot| slot.set(code));
}
