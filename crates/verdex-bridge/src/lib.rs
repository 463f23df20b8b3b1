//! The Verdex Bridge: a single in-page JavaScript bundle that gives a host
//! process DOM exploration primitives over a small, stable method surface.
//!
//! The bundle is registered once per frame (via
//! `Page.addScriptToEvaluateOnNewDocument`, scoped to an isolated world) and
//! exposes `window.__BridgeFactory__`, a factory with a `version` string and
//! a `create(config)` method. The host calls `create` once per execution
//! context and then invokes methods on the returned Bridge instance through
//! `Runtime.callFunctionOn`.
//!
//! This crate owns the bundle's source text and the Rust-side shapes used to
//! deserialize its method results. It does not talk to CDP itself — that is
//! `verdex-core`'s job.

mod bundle;

pub use bundle::{bridge_bundle_js, BRIDGE_VERSION};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tuning knobs passed to `__BridgeFactory__.create`.
///
/// Mirrors the JS-side `config` object; fields map 1:1 onto the bundle's
/// `Bridge` constructor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    pub max_depth: u32,
    pub max_siblings: u32,
    pub max_descendants: u32,
    pub max_outline_items: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_siblings: 15,
            max_descendants: 100,
            max_outline_items: 6,
        }
    }
}

/// Result of `Bridge.snapshot()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResult {
    pub text: String,
    pub element_count: u64,
}

/// Result of `Bridge.click(ref)` / `Bridge.type(ref, text)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(rename = "ref")]
    pub element_ref: String,
    #[serde(flatten)]
    pub outcome: HashMap<String, bool>,
}

/// Result of `Bridge.inspect(ref)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectResult {
    #[serde(rename = "ref")]
    pub element_ref: String,
    pub tag_name: String,
    pub role: String,
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub visible: bool,
    pub bounds: ElementBounds,
    pub sibling_index: u32,
    pub parent_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElementBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Result of `Bridge.resolve_container(ref)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveContainerResult {
    pub target: String,
    pub ancestors: Vec<AncestorInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AncestorInfo {
    pub level: u32,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    #[serde(rename = "childElementCount")]
    pub child_element_count: u32,
    pub refs: Vec<String>,
}

/// Result of `Bridge.inspect_pattern(ref, ancestor_level)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectPatternResult {
    pub ancestor_level: u32,
    pub container_at: Option<ContainerInfo>,
    pub target_sibling_index: i32,
    pub siblings: Vec<SiblingInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub tag: String,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingInfo {
    pub index: u32,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub refs: Vec<String>,
    pub texts: Vec<String>,
    pub is_target_type: bool,
    pub outline: Vec<OutlineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineItem {
    pub tag: String,
    pub role: String,
    pub text: String,
    pub testid: Option<String>,
}

/// Result of `Bridge.extract_anchors(ref, ancestor_level)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractAnchorsResult {
    pub ancestor_at: Option<ContainerInfo>,
    pub descendants: Vec<DescendantInfo>,
    pub total_descendants: u32,
    pub max_depth_reached: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescendantInfo {
    pub depth: u32,
    pub index: u32,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    #[serde(rename = "ref")]
    pub element_ref: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub direct_text: String,
    pub full_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_config_default_matches_bundle_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_siblings, 15);
        assert_eq!(config.max_descendants, 100);
        assert_eq!(config.max_outline_items, 6);
    }

    #[test]
    fn snapshot_result_round_trips_through_json() {
        let result = SnapshotResult {
            text: "- button \"Submit\" [ref=e1]".to_string(),
            element_count: 1,
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: SnapshotResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.text, result.text);
        assert_eq!(parsed.element_count, result.element_count);
    }

    #[test]
    fn bridge_version_is_stable_string() {
        assert_eq!(BRIDGE_VERSION, "1");
    }
}
