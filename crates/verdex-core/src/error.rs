//! Error taxonomy for the Bridge Injector and Multi-Context Runtime.
//!
//! [`BridgeError`] carries the six injector/bridge-facing kinds from the
//! error design (`ElementNotFound`, `StaleElement`, `FrameDetached`,
//! `FrameInjectionError`, `BridgeVersionMismatch`, `BridgeMethodException`).
//! [`RuntimeError`] adds the two runtime-facing kinds (`NavigationError`,
//! `RoleInitError`) and wraps `BridgeError` for operations that delegate to
//! an injector. The tool façade (out of scope here) is expected to render
//! these as human-readable text, never as opaque stack traces.

use std::time::Duration;

use thiserror::Error;

pub use verdex_cdp::CdpError;

/// Errors surfaced by a Bridge Injector while driving the in-page Bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The ref is not present in the Bridge's `ElementsMap`.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// The ref resolved to an element that is no longer connected.
    ///
    /// The stale entry and its DOM-side stamp have already been cleaned up
    /// by the time this is raised.
    #[error("element is stale: {ref_} (role={role}, name=\"{name}\")")]
    StaleElement {
        ref_: String,
        role: String,
        name: String,
    },

    /// The frame disappeared while a caller was awaiting isolated-world readiness.
    #[error("frame {0} detached while waiting for Bridge readiness")]
    FrameDetached(String),

    /// The isolated world could not be created or the bundle could not be evaluated.
    #[error("failed to inject Bridge into frame {frame_id}: {reason}")]
    FrameInjectionError { frame_id: String, reason: String },

    /// The in-page factory's version does not match the host-declared version.
    #[error("Bridge version mismatch in frame {frame_id}: host expects {expected}, found {found}")]
    BridgeVersionMismatch {
        frame_id: String,
        expected: String,
        found: String,
    },

    /// An exception thrown by the in-page method body, forwarded verbatim.
    #[error("Bridge method threw: {0}")]
    BridgeMethodException(String),

    /// Underlying CDP transport failure.
    #[error(transparent)]
    Cdp(#[from] CdpError),
}

/// Errors surfaced by the Multi-Context Runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A Bridge Injector operation failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Page navigation failed (DNS, timeout, hard network error).
    ///
    /// The owning `RoleContext` remains usable; a snapshot can still be
    /// taken of whatever state the page reached.
    #[error("navigation to {url} failed: {reason}")]
    NavigationError { url: String, reason: String },

    /// Context, page, or auth-state setup failed while initializing a role.
    ///
    /// The cached role-init promise is removed so a retry can succeed.
    #[error("failed to initialize role '{role}': {reason}")]
    RoleInitError { role: String, reason: String },

    /// The requested role has no configuration and was never selected.
    #[error("unknown role: {0}")]
    RoleNotFound(String),

    /// Browser process launch or connection failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// Underlying CDP transport failure.
    #[error(transparent)]
    Cdp(#[from] CdpError),
}

impl RuntimeError {
    /// Wrap an error with the role and operation name that produced it,
    /// per the propagation policy: the Runtime attaches this context before
    /// handing the error to the tool façade.
    pub fn with_context(self, role: &str, operation: &str) -> Self {
        match self {
            RuntimeError::Bridge(BridgeError::BridgeMethodException(msg)) => {
                RuntimeError::Bridge(BridgeError::BridgeMethodException(format!(
                    "[role={role}, op={operation}] {msg}"
                )))
            }
            other => other,
        }
    }
}

/// Errors that can occur while launching or connecting to the browser process.
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Chromium not found. Set CHROMIUM_PATH environment variable or ensure Chromium is installed.")]
    ChromiumNotFound,

    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("browser launch timed out after {0:?}")]
    LaunchTimeout(Duration),

    #[error("failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("browser is closed")]
    Closed,

    #[error(transparent)]
    Cdp(#[from] CdpError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_element_display_includes_ref_and_name() {
        let err = BridgeError::StaleElement {
            ref_: "e5".to_string(),
            role: "button".to_string(),
            name: "Add to Cart".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("e5"));
        assert!(text.contains("Add to Cart"));
    }

    #[test]
    fn runtime_error_with_context_prefixes_bridge_method_exception() {
        let err = RuntimeError::Bridge(BridgeError::BridgeMethodException("boom".to_string()));
        let wrapped = err.with_context("admin", "click");
        assert!(wrapped.to_string().contains("role=admin"));
        assert!(wrapped.to_string().contains("op=click"));
        assert!(wrapped.to_string().contains("boom"));
    }

    #[test]
    fn role_not_found_display() {
        let err = RuntimeError::RoleNotFound("ghost".to_string());
        assert_eq!(err.to_string(), "unknown role: ghost");
    }
}
