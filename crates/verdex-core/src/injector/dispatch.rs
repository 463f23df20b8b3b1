//! JS snippets the Injector evaluates via `Runtime.callFunctionOn`, built
//! with the same compile-time-checked `js!` macro used for the Bridge
//! bundle itself.

use verdex_bridge::{BridgeConfig, BRIDGE_VERSION};
use verdex_js::js;
use verdex_js_core::ToJsValue;

/// Lazily constructs `window.__verdexBridge` from `window.__BridgeFactory__`
/// and checks its version. Throws `verdex-bridge-version-mismatch:<found>`
/// on a mismatch so the caller can turn it into a structured error.
pub fn ensure_bridge_function(config: &BridgeConfig) -> String {
    let max_depth = config.max_depth;
    let max_siblings = config.max_siblings;
    let max_descendants = config.max_descendants;
    let max_outline_items = config.max_outline_items;
    js! {
        function () {
            if (!window.__BridgeFactory__) {
                throw new Error("Bridge factory not present in this world");
            }
            if (window.__BridgeFactory__.version !== #{BRIDGE_VERSION}) {
                throw new Error("verdex-bridge-version-mismatch:" + window.__BridgeFactory__.version);
            }
            if (!window.__verdexBridge) {
                window.__verdexBridge = window.__BridgeFactory__.create({
                    maxDepth: #{max_depth},
                    maxSiblings: #{max_siblings},
                    maxDescendants: #{max_descendants},
                    maxOutlineItems: #{max_outline_items},
                });
            }
            return true;
        }
    }
}

/// Dispatches a named method call on the frame's cached Bridge instance.
/// First argument is the method name, the rest are forwarded positionally.
pub const DISPATCH_FUNCTION: &str = js! {
    function (methodName, ...args) {
        return window.__verdexBridge[methodName](...args);
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_bridge_function_embeds_version_and_config() {
        let config = BridgeConfig {
            max_depth: 7,
            ..Default::default()
        };
        let source = ensure_bridge_function(&config);
        assert!(source.contains(BRIDGE_VERSION));
        assert!(source.contains("__BridgeFactory__"));
        assert!(source.contains("maxDepth: 7"));
    }

    #[test]
    fn dispatch_function_forwards_method_name_and_args() {
        assert!(DISPATCH_FUNCTION.contains("methodName"));
        assert!(DISPATCH_FUNCTION.contains("window.__verdexBridge[methodName]"));
    }
}
