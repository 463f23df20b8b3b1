//! # Verdex Core
//!
//! The Multi-Context Runtime: launches and owns a single Chromium process,
//! lazily creates a browser context per role, and drives each role's page
//! through a Bridge Injector so DOM exploration can be exposed to an agent
//! as a small, stable operation set.
//!
//! ## Module Organization
//!
//! - [`browser`] - Browser process launching and the process-wide [`Browser`] handle
//! - [`role_context`] - Per-role browser context, page, and auth-state application
//! - [`injector`] - The Bridge Injector: in-page world tracking and method dispatch
//! - [`runtime`] - [`VerdexRuntime`]: role lifecycle and the operation table
//! - [`error`] - Error types for the injector, runtime, and browser layers

pub mod browser;
pub mod error;
pub mod injector;
pub mod role_context;
pub mod runtime;

pub use browser::{Browser, BrowserBuilder, UserDataDir};
pub use error::{BridgeError, BrowserError, RuntimeError};
pub use injector::BridgeInjector;
pub use role_context::{AuthState, RoleConfig, RoleContext};
pub use runtime::{NavigateResponse, NavigationMetadata, RuntimeConfig, VerdexRuntime, DEFAULT_ROLE};
