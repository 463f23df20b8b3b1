//! The Multi-Context Runtime: one process-wide browser, lazily created
//! per-role contexts, and the operation table that routes every call to
//! the current role's Bridge Injector.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{info, warn};

use verdex_bridge::{
    ActionResult, ExtractAnchorsResult, InspectPatternResult, InspectResult,
    ResolveContainerResult, SnapshotResult,
};
use verdex_cdp::protocol::page::NavigateResult;
use verdex_cdp::protocol::runtime::EvaluateParams;

use crate::browser::Browser;
use crate::error::{BridgeError, BrowserError, RuntimeError};
use crate::injector::{DEFAULT_FAST_PATH_TIMEOUT, DEFAULT_ISOLATED_WORLD_NAME};
use crate::role_context::{RoleConfig, RoleContext};

pub const DEFAULT_ROLE: &str = "default";
const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CLICK_SETTLE_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_WAIT_MS: u64 = 1000;

/// Navigation outcome metadata attached to a snapshot after `navigate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationMetadata {
    pub url: String,
    pub title: String,
    pub status: Option<u32>,
    pub content_type: Option<String>,
    pub redirect_count: u32,
    pub load_time_ms: u64,
}

/// Result of `navigate`: navigation metadata plus the post-navigation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub navigation: NavigationMetadata,
    pub text: String,
    pub element_count: u64,
}

/// Tuning knobs for the runtime itself (distinct from per-role config).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub headless: bool,
    pub navigation_timeout: Duration,
    /// Name of the isolated world the Bridge bundle is pinned to.
    pub isolated_world_name: String,
    /// Bound on waiting for an auto-injected isolated world before falling
    /// back to an explicit `Page.createIsolatedWorld` call.
    pub isolated_world_fast_path_timeout: Duration,
    /// How long `click` waits after dispatching, to let the page settle.
    /// Not a protocol guarantee, just a pragmatic delay.
    pub click_settle_delay: Duration,
    /// Bridge factory tuning (`maxDepth`/`maxSiblings`/`maxDescendants`/
    /// `maxOutlineItems`) applied when the in-page Bridge is constructed.
    pub bridge_config: verdex_bridge::BridgeConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            isolated_world_name: DEFAULT_ISOLATED_WORLD_NAME.to_string(),
            isolated_world_fast_path_timeout: DEFAULT_FAST_PATH_TIMEOUT,
            click_settle_delay: DEFAULT_CLICK_SETTLE_DELAY,
            bridge_config: verdex_bridge::BridgeConfig::default(),
        }
    }
}

type RoleSlot = Arc<OnceCell<Arc<RoleContext>>>;

/// Holds the browser, every role's lazily-initialized context, and the
/// pointer to whichever role is currently selected.
pub struct VerdexRuntime {
    browser: Browser,
    configs: HashMap<String, RoleConfig>,
    roles: Mutex<HashMap<String, RoleSlot>>,
    current_role: RwLock<String>,
    navigation_timeout: Duration,
    runtime_config: RuntimeConfig,
}

impl VerdexRuntime {
    /// Launch the browser and register the given role configurations.
    /// The `default` role is implicit and always uses the browser's shared context.
    pub async fn launch(
        runtime_config: RuntimeConfig,
        role_configs: Vec<RoleConfig>,
    ) -> Result<Self, RuntimeError> {
        let browser = Browser::launch()
            .headless(runtime_config.headless)
            .launch()
            .await?;

        let mut configs = HashMap::new();
        configs.insert(
            DEFAULT_ROLE.to_string(),
            RoleConfig {
                name: DEFAULT_ROLE.to_string(),
                auth_state_path: None,
                default_url: None,
            },
        );
        for config in role_configs {
            configs.insert(config.name.clone(), config);
        }

        let navigation_timeout = runtime_config.navigation_timeout;

        Ok(Self {
            browser,
            configs,
            roles: Mutex::new(HashMap::new()),
            current_role: RwLock::new(DEFAULT_ROLE.to_string()),
            navigation_timeout,
            runtime_config,
        })
    }

    /// Initialize (or fetch the already-initialized) `RoleContext` for a role name.
    /// Concurrent callers for the same role share one initialization; a failed
    /// attempt does not poison the slot, so the next caller retries cleanly.
    async fn role_context(&self, role: &str) -> Result<Arc<RoleContext>, RuntimeError> {
        if !self.browser.connection().is_connected() {
            return Err(RuntimeError::Browser(BrowserError::Closed));
        }

        let config = self
            .configs
            .get(role)
            .ok_or_else(|| RuntimeError::RoleNotFound(role.to_string()))?
            .clone();

        let slot = {
            let mut roles = self.roles.lock().await;
            roles
                .entry(role.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        slot.get_or_try_init(|| async {
            info!(role = %role, "initializing role context");
            let ctx = if role == DEFAULT_ROLE {
                RoleContext::create_default(&self.browser, &config, &self.runtime_config).await?
            } else {
                RoleContext::create_isolated(&self.browser, &config, &self.runtime_config).await?
            };
            Ok::<_, RuntimeError>(Arc::new(ctx))
        })
        .await
        .cloned()
    }

    async fn current(&self) -> Result<Arc<RoleContext>, RuntimeError> {
        let role = self.current_role.read().await.clone();
        self.role_context(&role).await
    }

    pub async fn get_current_role(&self) -> String {
        self.current_role.read().await.clone()
    }

    /// Configured role names and which ones have already been initialized.
    pub async fn list_current_roles(&self) -> (Vec<String>, Vec<String>) {
        let configured: Vec<String> = self.configs.keys().cloned().collect();
        let roles = self.roles.lock().await;
        let active = roles
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        (configured, active)
    }

    /// Switch the current role, seeding its default URL on first selection.
    /// Rolls back (current role unchanged) if the target role fails to initialize.
    pub async fn select_role(&self, role: &str) -> Result<(), RuntimeError> {
        let ctx = self.role_context(role).await?;

        if let Some(default_url) = ctx.default_url.clone() {
            if !ctx.has_navigated() {
                let is_blank = {
                    let location: Result<String, RuntimeError> = self.read_location(&ctx).await;
                    matches!(location.as_deref(), Ok("about:blank") | Ok(""))
                };
                if is_blank {
                    self.navigate_context(&ctx, default_url.as_str()).await?;
                }
            }
        }

        *self.current_role.write().await = role.to_string();
        Ok(())
    }

    async fn read_location(&self, ctx: &RoleContext) -> Result<String, RuntimeError> {
        let result: Result<serde_json::Value, _> = self
            .browser
            .connection()
            .send_command(
                "Runtime.evaluate",
                Some(EvaluateParams {
                    expression: "location.href".to_string(),
                    object_group: None,
                    include_command_line_api: None,
                    silent: Some(true),
                    context_id: None,
                    return_by_value: Some(true),
                    await_promise: Some(false),
                }),
                Some(ctx.session_id()),
            )
            .await;
        match result {
            Ok(value) => Ok(value
                .get("result")
                .and_then(|r| r.get("value"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()),
            Err(e) => Err(RuntimeError::Bridge(BridgeError::Cdp(e))),
        }
    }

    /// Navigate the current role's page with a network-idle wait condition.
    pub async fn navigate(&self, url: &str) -> Result<NavigateResponse, RuntimeError> {
        let ctx = self.current().await?;
        let navigation = self.navigate_context(&ctx, url).await?;
        let snapshot = self.snapshot_inner(&ctx).await?;
        Ok(NavigateResponse {
            navigation,
            text: snapshot.text,
            element_count: snapshot.element_count,
        })
    }

    async fn navigate_context(
        &self,
        ctx: &RoleContext,
        url: &str,
    ) -> Result<NavigationMetadata, RuntimeError> {
        let started = Instant::now();
        let connection = self.browser.connection().clone();
        let mut events = connection.subscribe_events();

        let navigate_result: NavigateResult = connection
            .send_command(
                "Page.navigate",
                Some(verdex_cdp::protocol::page::NavigateParams {
                    url: url.to_string(),
                    referrer: None,
                    transition_type: None,
                    frame_id: Some(ctx.main_frame_id().to_string()),
                }),
                Some(ctx.session_id()),
            )
            .await
            .map_err(|e| RuntimeError::NavigationError {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(error_text) = navigate_result.error_text {
            return Err(RuntimeError::NavigationError {
                url: url.to_string(),
                reason: error_text,
            });
        }
        let loader_id = navigate_result.loader_id;

        let mut redirect_count = 0u32;
        let mut status = None;
        let mut content_type = None;

        let deadline = tokio::time::Instant::now() + self.navigation_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            let event = match tokio::time::timeout(remaining, events.recv()).await {
                Ok(Ok(event)) => event,
                _ => break,
            };
            if event.session_id.as_deref() != Some(ctx.session_id()) {
                continue;
            }
            let Some(params) = event.params.clone() else { continue };
            match event.method.as_str() {
                "Network.requestWillBeSent" => {
                    if let Ok(e) = serde_json::from_value::<
                        verdex_cdp::protocol::network::RequestWillBeSentEvent,
                    >(params)
                    {
                        if e.frame_id.as_deref() == Some(ctx.main_frame_id()) {
                            if let Some(redirect) = &e.redirect_response {
                                if (300..400).contains(&redirect.status) && redirect.url != e.request.url {
                                    redirect_count += 1;
                                }
                            }
                        }
                    }
                }
                "Network.responseReceived" => {
                    if let Ok(e) = serde_json::from_value::<
                        verdex_cdp::protocol::network::ResponseReceivedEvent,
                    >(params)
                    {
                        if e.frame_id.as_deref() == Some(ctx.main_frame_id())
                            && e.resource_type == "Document"
                        {
                            status = Some(e.response.status);
                            content_type = Some(e.response.mime_type.clone());
                        }
                    }
                }
                "Page.lifecycleEvent" => {
                    if let Ok(e) =
                        serde_json::from_value::<verdex_cdp::protocol::page::LifecycleEvent>(params)
                    {
                        let loader_matches = loader_id.as_deref() == Some(e.loader_id.as_str());
                        if e.frame_id == ctx.main_frame_id()
                            && loader_matches
                            && e.name == "networkIdle"
                        {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }

        let location = self.read_location(ctx).await.unwrap_or_default();
        let title = self.read_title(ctx).await.unwrap_or_default();

        ctx.mark_navigated();

        Ok(NavigationMetadata {
            url: location,
            title,
            status,
            content_type,
            redirect_count,
            load_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn read_title(&self, ctx: &RoleContext) -> Result<String, RuntimeError> {
        let result: serde_json::Value = self
            .browser
            .connection()
            .send_command(
                "Runtime.evaluate",
                Some(EvaluateParams {
                    expression: "document.title".to_string(),
                    object_group: None,
                    include_command_line_api: None,
                    silent: Some(true),
                    context_id: None,
                    return_by_value: Some(true),
                    await_promise: Some(false),
                }),
                Some(ctx.session_id()),
            )
            .await
            .map_err(|e| RuntimeError::Bridge(BridgeError::Cdp(e)))?;
        Ok(result
            .get("result")
            .and_then(|r| r.get("value"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }

    pub async fn snapshot(&self) -> Result<SnapshotResult, RuntimeError> {
        let ctx = self.current().await?;
        self.snapshot_inner(&ctx).await
    }

    async fn snapshot_inner(&self, ctx: &RoleContext) -> Result<SnapshotResult, RuntimeError> {
        ctx.touch();
        let mut result: SnapshotResult = ctx
            .injector
            .call_bridge_method(ctx.main_frame_id(), "snapshot", vec![])
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "snapshot"))?;

        let child_frame_ids = ctx.injector.child_frame_ids().await.unwrap_or_else(|e| {
            warn!(role = %ctx.role, error = %e, "failed to read child frame tree, skipping iframe snapshots");
            Vec::new()
        });
        ctx.set_frame_index(child_frame_ids.clone());

        for (i, frame_id) in child_frame_ids.iter().enumerate() {
            let frame_ordinal = i + 1;
            match ctx
                .injector
                .call_bridge_method::<SnapshotResult>(frame_id, "snapshot", vec![])
                .await
            {
                Ok(child) => {
                    result.text = splice_frame_snapshot(&result.text, frame_ordinal, &child.text);
                    result.element_count += child.element_count;
                }
                Err(e) => {
                    warn!(role = %ctx.role, frame_id = %frame_id, frame = format!("f{frame_ordinal}"), error = %e, "failed to snapshot child frame, leaving it as an unexpanded placeholder");
                }
            }
        }

        Ok(result)
    }

    pub async fn click(&self, element_ref: &str) -> Result<ActionResult, RuntimeError> {
        let ctx = self.current().await?;
        ctx.touch();
        let (frame_id, local_ref) = resolve_frame(&ctx, element_ref);
        let result = ctx
            .injector
            .call_bridge_method(&frame_id, "click", vec![serde_json::json!(local_ref)])
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "click"))?;
        tokio::time::sleep(self.runtime_config.click_settle_delay).await;
        Ok(result)
    }

    pub async fn type_text(&self, element_ref: &str, text: &str) -> Result<ActionResult, RuntimeError> {
        let ctx = self.current().await?;
        ctx.touch();
        let (frame_id, local_ref) = resolve_frame(&ctx, element_ref);
        ctx.injector
            .call_bridge_method(
                &frame_id,
                "type",
                vec![serde_json::json!(local_ref), serde_json::json!(text)],
            )
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "type"))
    }

    pub async fn inspect(&self, element_ref: &str) -> Result<InspectResult, RuntimeError> {
        let ctx = self.current().await?;
        ctx.touch();
        let (frame_id, local_ref) = resolve_frame(&ctx, element_ref);
        ctx.injector
            .call_bridge_method(&frame_id, "inspect", vec![serde_json::json!(local_ref)])
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "inspect"))
    }

    pub async fn resolve_container(
        &self,
        element_ref: &str,
    ) -> Result<ResolveContainerResult, RuntimeError> {
        let ctx = self.current().await?;
        ctx.touch();
        let (frame_id, local_ref) = resolve_frame(&ctx, element_ref);
        ctx.injector
            .call_bridge_method(&frame_id, "resolve_container", vec![serde_json::json!(local_ref)])
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "resolve_container"))
    }

    pub async fn inspect_pattern(
        &self,
        element_ref: &str,
        ancestor_level: u32,
    ) -> Result<InspectPatternResult, RuntimeError> {
        let ctx = self.current().await?;
        ctx.touch();
        let (frame_id, local_ref) = resolve_frame(&ctx, element_ref);
        ctx.injector
            .call_bridge_method(
                &frame_id,
                "inspect_pattern",
                vec![serde_json::json!(local_ref), serde_json::json!(ancestor_level)],
            )
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "inspect_pattern"))
    }

    pub async fn extract_anchors(
        &self,
        element_ref: &str,
        ancestor_level: u32,
    ) -> Result<ExtractAnchorsResult, RuntimeError> {
        let ctx = self.current().await?;
        ctx.touch();
        let (frame_id, local_ref) = resolve_frame(&ctx, element_ref);
        ctx.injector
            .call_bridge_method(
                &frame_id,
                "extract_anchors",
                vec![serde_json::json!(local_ref), serde_json::json!(ancestor_level)],
            )
            .await
            .map_err(|e| RuntimeError::from(e).with_context(&ctx.role, "extract_anchors"))
    }

    pub async fn wait(&self, millis: Option<u64>) {
        tokio::time::sleep(Duration::from_millis(millis.unwrap_or(DEFAULT_WAIT_MS))).await;
    }

    /// Close every role context (detach, close target, dispose browser context
    /// in that order), then the browser. Cleanup errors are logged and swallowed.
    pub async fn close(&self) {
        let roles = self.roles.lock().await;
        for (name, slot) in roles.iter() {
            if let Some(ctx) = slot.get() {
                ctx.injector.dispose().await;
                ctx.close(self.browser.connection()).await;
            } else {
                warn!(role = %name, "role context was never initialized, skipping close");
            }
        }
        if let Err(err) = self.browser.close().await {
            warn!(error = %err, "failed to close browser");
        }
    }
}

/// Parses a ref into its target frame id and the local ref to pass to that
/// frame's Bridge (`f<k>_e<n>` → the k-th child frame from the last snapshot
/// and `e<n>`; a bare `e<n>` always targets the main frame).
fn resolve_frame(ctx: &RoleContext, element_ref: &str) -> (String, String) {
    if let Some((frame_part, local_ref)) = element_ref.split_once('_') {
        if let Some(ordinal) = frame_part.strip_prefix('f') {
            if let Ok(ordinal) = ordinal.parse::<usize>() {
                if let Some(frame_id) = ctx.frame_id_for_index(ordinal) {
                    return (frame_id, local_ref.to_string());
                }
                warn!(role = %ctx.role, frame = %frame_part, "qualified ref names a frame not seen in the last snapshot, falling back to the main frame");
            }
        }
    }
    (ctx.main_frame_id().to_string(), element_ref.to_string())
}

/// Splices a child frame's rendered snapshot into its `- iframe [frame=f<k>]`
/// placeholder line in the parent's snapshot text, qualifying every `e<n>`
/// ref in the child's text as `f<k>_e<n>` along the way.
fn splice_frame_snapshot(parent_text: &str, frame_ordinal: usize, child_text: &str) -> String {
    let marker = format!("[frame=f{frame_ordinal}]");
    let qualified_prefix = format!("[ref=f{frame_ordinal}_e");
    let qualified_child = child_text.replace("[ref=e", &qualified_prefix);

    let mut out = Vec::new();
    let mut spliced = false;
    for line in parent_text.lines() {
        if !spliced && line.contains(&marker) {
            let indent: String = line.chars().take_while(|c| *c == ' ').collect();
            out.push(format!("{indent}- iframe"));
            for child_line in qualified_child.lines() {
                out.push(format!("{indent}  {child_line}"));
            }
            spliced = true;
            continue;
        }
        out.push(line.to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_name_is_stable() {
        assert_eq!(DEFAULT_ROLE, "default");
    }

    #[test]
    fn runtime_config_defaults_match_bridge_injector_defaults() {
        let config = RuntimeConfig::default();
        assert!(config.headless);
        assert_eq!(config.isolated_world_name, "verdex_isolated");
        assert_eq!(config.isolated_world_fast_path_timeout, Duration::from_millis(500));
        assert_eq!(config.click_settle_delay, Duration::from_millis(500));
        assert_eq!(config.bridge_config.max_depth, 4);
    }
}
