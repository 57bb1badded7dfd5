//! Routes SIGINT into a [`CancelToken`] so a Ctrl-C mid-run lets the harness
//! kill the container, clean up, and exit 130 instead of dying mid-phase.

use crate::docker::CancelToken;

#[cfg(unix)]
static TOKEN: std::sync::OnceLock<CancelToken> = std::sync::OnceLock::new();

#[cfg(unix)]
extern "C" fn on_sigint(_: libc::c_int) {
    if let Some(token) = TOKEN.get() {
        token.cancel();
    }
}

/// Install the SIGINT handler. Only the first installed token is honored;
/// repeat presses keep tripping the same token.
#[cfg(unix)]
pub fn install(token: &CancelToken) {
    let _ = TOKEN.set(token.clone());

    let handler = on_sigint as extern "C" fn(libc::c_int);
    // SAFETY: the handler body is a single atomic store behind an already
    // initialized OnceLock, which is async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

/// No interrupt routing off unix; runs simply terminate on Ctrl-C.
#[cfg(not(unix))]
pub fn install(_token: &CancelToken) {}
