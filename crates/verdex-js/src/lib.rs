//! # Verdex JS - Compile-Time JavaScript Validation
//!
//! This crate provides the `js!` macro for compile-time JavaScript validation,
//! catching syntax errors before they reach the browser. Similar to how
//! `serde_json::json!` validates JSON at compile time.
//!
//! ## Features
//!
//! - **Compile-time validation**: JavaScript syntax errors are caught during compilation
//! - **Value interpolation**: Embed Rust values using `#{expr}` syntax (quoted/escaped)
//! - **Raw interpolation**: Inject pre-built JavaScript using `@{expr}` syntax (unquoted)
//! - **Zero runtime overhead**: Static strings when no interpolation is used
//! - **Clear error messages**: Points to the exact location of syntax errors
//! - **Full JavaScript syntax**: Single-quoted strings, template literals, regex, and more
//!
//! ## Quick Start
//!
//! ```no_run
//! use verdex_js::js;
//! use verdex_js_core::ToJsValue;
//!
//! // Simple expression - produces &'static str
//! let code = js!{ 1 + 2 };
//! assert_eq!(code, "1 + 2");
//!
//! // Arrow function
//! let code = js!{ () => window.innerWidth };
//!
//! // With value interpolation (requires ToJsValue in scope)
//! let world_name = "verdex_isolated";
//! let code = js!{ window.__verdexWorld = #{world_name} };
//!
//! // Multi-line function
//! let code = js!{
//!     (() => {
//!         const items = document.querySelectorAll("button");
//!         return items.length;
//!     })()
//! };
//! ```
//!
//! ## Value Interpolation (`#{expr}`)
//!
//! Use `#{expr}` to embed Rust values into JavaScript. Values are automatically
//! converted to JavaScript representations via the [`ToJsValue`] trait:
//!
//! - Strings are quoted and escaped
//! - Numbers are inserted as-is
//! - Booleans become `true` or `false`
//! - `Option::None` becomes `null`
//!
//! ```no_run
//! use verdex_js::js;
//! use verdex_js_core::ToJsValue;
//!
//! let max_depth = 4;
//! let max_siblings = 15;
//! let grant_universal_access = false;
//!
//! // Numbers as-is: factory.create({ maxDepth: 4 })
//! let code = js!{ factory.create({ maxDepth: #{max_depth}, maxSiblings: #{max_siblings} }) };
//!
//! // Booleans: el.disabled = true
//! let code = js!{ el.disabled = #{grant_universal_access} };
//! ```
//!
//! ## Raw Interpolation (`@{expr}`)
//!
//! Use `@{expr}` to inject pre-built JavaScript expressions directly without
//! quoting or escaping. The expression must return something that implements
//! `AsRef<str>`. This is useful for:
//!
//! - Injecting dynamically-built selector expressions
//! - Composing JavaScript from multiple parts
//! - Including pre-validated JavaScript fragments
//!
//! ```no_run
//! use verdex_js::js;
//!
//! // Compose JavaScript fragments
//! let method_call = "bridge.snapshot()";
//! let code = js!{ const result = @{method_call} };
//! // Produces: const result = bridge.snapshot()
//! ```
//!
//! ## Output Type
//!
//! - **Without interpolation**: Returns `&'static str` (zero runtime cost)
//! - **With interpolation**: Returns `String` (runtime string building)
//!
//! ```no_run
//! use verdex_js::js;
//! use verdex_js_core::ToJsValue;
//!
//! // Static string, no allocation
//! let code: &'static str = js!{ 1 + 2 };
//!
//! // Dynamic string due to interpolation
//! let x = 5;
//! let code: String = js!{ 1 + #{x} };
//! ```
//!
//! ## Compile-Time Error Detection
//!
//! Invalid JavaScript produces clear compile-time errors:
//!
//! ```text
//! // This will produce a compile-time error because the JavaScript is invalid
//! use verdex_js::js;
//! let code = js!{ function( };
//! // Error: unexpected end of input
//! ```
//!
//! ## Supported JavaScript Syntax
//!
//! The macro supports a wide range of JavaScript syntax:
//!
//! ```text
//! use verdex_js::js;
//!
//! // Single-quoted strings
//! let code = js!{ document.querySelector('div') };
//!
//! // Template literals
//! let code = js!{ `Hello ${name}` };
//!
//! // Arrow functions
//! let code = js!{ (x) => x * 2 };
//!
//! // Object literals
//! let code = js!{ { role: "button", name: "Submit" } };
//!
//! // Array literals
//! let code = js!{ [1, 2, 3].map(x => x * 2) };
//!
//! // Regular expressions
//! let code = js!{ /pattern/gi };
//!
//! // Async/await
//! let code = js!{ async () => await fetch('/api') };
//!
//! // Classes
//! let code = js!{ class Bridge { constructor(config) { this.config = config; } } };
//! ```
//!
//! ## Integration with the Verdex Bridge bundle
//!
//! The `js!` macro is used to author the in-page Bridge bundle that gets registered
//! as an on-new-document script and evaluated inside a named isolated world:
//!
//! ```ignore
//! use verdex_js::js;
//!
//! fn bridge_factory_bundle() -> &'static str {
//!     js! {
//!         (function() {
//!             window.__BridgeFactory__ = {
//!                 version: "1",
//!                 create(config) { return new Bridge(config); }
//!             };
//!         })()
//!     }
//! }
//! ```
//!
//! [`ToJsValue`]: verdex_js_core::ToJsValue

use proc_macro::TokenStream;

mod interpolation;
mod js_macro;
mod parser;
mod scanner;

/// A macro that validates JavaScript syntax at compile time.
///
/// This macro accepts JavaScript code and validates its syntax during compilation.
/// If the JavaScript is invalid, a compile-time error is produced with details
/// about the syntax error.
///
/// # Output Type
///
/// - Without interpolation: Returns `&'static str`
/// - With interpolation: Returns `String`
///
/// # Examples
///
/// ## Simple Expression
///
/// ```no_run
/// use verdex_js::js;
///
/// let code: &str = js!{ 1 + 2 };
/// assert_eq!(code, "1 + 2");
/// ```
///
/// ## Arrow Function
///
/// ```no_run
/// use verdex_js::js;
///
/// let code = js!{ () => window.innerWidth };
/// ```
///
/// ## With Interpolation
///
/// ```no_run
/// use verdex_js::js;
/// use verdex_js_core::ToJsValue;
///
/// let world_name = "verdex_isolated";
/// let code: String = js!{ window.name === #{world_name} };
/// ```
///
/// ## Invalid JavaScript (Compile Error)
///
/// ```text
/// // This will produce a compile-time error because the JavaScript is invalid
/// use verdex_js::js;
/// let code = js!{ function( };
/// // Error: unexpected end of input
/// ```
#[proc_macro]
pub fn js(input: TokenStream) -> TokenStream {
    js_macro::js_impl(input)
}
