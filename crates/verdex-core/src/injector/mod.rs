//! The Bridge Injector: a host-side controller over the remote JS world.
//!
//! Registers the Bridge bundle as an on-new-document script pinned to a
//! named isolated world, tracks that world's execution context per frame
//! via [`FrameState`], lazily constructs the in-page `Bridge` instance on
//! first use, and forwards method calls through `Runtime.callFunctionOn`.
//!
//! Grounded on the execution-context tracking pattern used elsewhere in
//! this crate for per-frame world bookkeeping, extended here with a
//! completion latch: callers awaiting a frame's isolated world block on a
//! oneshot that the event-handling task resolves once
//! `Runtime.executionContextCreated` reports a matching world.

mod dispatch;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use verdex_bridge::{bridge_bundle_js, BridgeConfig, BRIDGE_VERSION};
use verdex_cdp::protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CreateIsolatedWorldParams, CreateIsolatedWorldResult,
    FrameAttachedEvent, FrameDetachedEvent, FrameNavigatedEvent, GetFrameTreeResult,
    NavigatedWithinDocumentEvent, RemoveScriptToEvaluateOnNewDocumentParams,
};
use verdex_cdp::protocol::runtime::{
    CallArgument, CallFunctionOnParams, CallFunctionOnResult, EvaluateParams,
    ExecutionContextCreatedEvent, ExecutionContextDestroyedEvent, ExecutionContextId,
};
use verdex_cdp::CdpConnection;

use crate::error::BridgeError;

/// Default name of the isolated world the Bridge bundle runs in.
pub const DEFAULT_ISOLATED_WORLD_NAME: &str = "verdex_isolated";

/// Default bound on the fast path of waiting for an auto-injected isolated
/// world before falling back to explicit `Page.createIsolatedWorld`.
pub const DEFAULT_FAST_PATH_TIMEOUT: Duration = Duration::from_millis(500);

/// Per-frame state: the isolated world's execution context, whether the
/// in-page `Bridge` instance has been constructed in it, and any callers
/// waiting for the context to become ready.
#[derive(Default)]
struct FrameState {
    context_id: Option<ExecutionContextId>,
    bridge_ready: bool,
    waiters: Vec<oneshot::Sender<Result<ExecutionContextId, BridgeError>>>,
}

/// Host-side controller over the in-page Bridge for a single CDP session.
pub struct BridgeInjector {
    connection: Arc<CdpConnection>,
    session_id: String,
    main_frame_id: String,
    world_name: String,
    fast_path_timeout: Duration,
    bridge_config: BridgeConfig,
    script_identifier: Mutex<Option<String>>,
    frames: Arc<Mutex<HashMap<String, FrameState>>>,
}

impl BridgeInjector {
    /// Subscribe to frame/context events, enable the required CDP domains,
    /// register the Bridge bundle as an on-new-document script, and
    /// populate the main frame's state.
    pub async fn new(
        connection: Arc<CdpConnection>,
        session_id: String,
        world_name: String,
        fast_path_timeout: Duration,
        bridge_config: BridgeConfig,
    ) -> Result<Self, BridgeError> {
        let frames: Arc<Mutex<HashMap<String, FrameState>>> = Arc::new(Mutex::new(HashMap::new()));

        // Subscribe before any domain is enabled so no event is missed.
        let mut events = connection.subscribe_events();
        let session_for_task = session_id.clone();
        let frames_for_task = frames.clone();
        let world_name_for_task = world_name.clone();
        let connection_for_task = connection.clone();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if event.session_id.as_deref() != Some(&session_for_task) {
                    continue;
                }
                let Some(params) = event.params.clone() else {
                    continue;
                };
                match event.method.as_str() {
                    "Runtime.executionContextCreated" => {
                        if let Ok(e) = serde_json::from_value::<ExecutionContextCreatedEvent>(params) {
                            handle_context_created(&frames_for_task, &world_name_for_task, e);
                        }
                    }
                    "Runtime.executionContextDestroyed" => {
                        if let Ok(e) = serde_json::from_value::<ExecutionContextDestroyedEvent>(params) {
                            handle_context_destroyed(&frames_for_task, e);
                        }
                    }
                    "Page.navigatedWithinDocument" => {
                        if let Ok(e) = serde_json::from_value::<NavigatedWithinDocumentEvent>(params) {
                            let context_id = {
                                let mut frames = frames_for_task.lock();
                                frames.get_mut(&e.frame_id).and_then(|state| {
                                    state.bridge_ready = false;
                                    state.context_id
                                })
                            };
                            // The isolated world survives a same-document navigation, so the
                            // stale `window.__verdexBridge` (and its ref counter) would too
                            // unless explicitly cleared here.
                            if let Some(context_id) = context_id {
                                let result = connection_for_task
                                    .send_command::<_, serde_json::Value>(
                                        "Runtime.evaluate",
                                        Some(EvaluateParams {
                                            expression: "delete window.__verdexBridge".to_string(),
                                            object_group: None,
                                            include_command_line_api: None,
                                            silent: Some(true),
                                            context_id: Some(context_id),
                                            return_by_value: Some(true),
                                            await_promise: Some(false),
                                        }),
                                        Some(&session_for_task),
                                    )
                                    .await;
                                if let Err(err) = result {
                                    warn!(frame_id = %e.frame_id, error = %err, "failed to clear stale bridge instance after same-document navigation");
                                }
                            }
                        }
                    }
                    "Page.frameNavigated" => {
                        if let Ok(e) = serde_json::from_value::<FrameNavigatedEvent>(params) {
                            let mut frames = frames_for_task.lock();
                            frames.remove(&e.frame.id);
                        }
                    }
                    "Page.frameAttached" => {
                        if let Ok(e) = serde_json::from_value::<FrameAttachedEvent>(params) {
                            let mut frames = frames_for_task.lock();
                            frames.entry(e.frame_id).or_default();
                        }
                    }
                    "Page.frameDetached" => {
                        if let Ok(e) = serde_json::from_value::<FrameDetachedEvent>(params) {
                            let mut frames = frames_for_task.lock();
                            if let Some(mut state) = frames.remove(&e.frame_id) {
                                for waiter in state.waiters.drain(..) {
                                    let _ = waiter.send(Err(BridgeError::FrameDetached(e.frame_id.clone())));
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        });

        connection
            .send_command::<(), serde_json::Value>("Runtime.enable", None, Some(&session_id))
            .await
            .map_err(BridgeError::Cdp)?;
        connection
            .send_command::<(), serde_json::Value>("Page.enable", None, Some(&session_id))
            .await
            .map_err(BridgeError::Cdp)?;
        connection
            .send_command::<(), serde_json::Value>("DOM.enable", None, Some(&session_id))
            .await
            .map_err(BridgeError::Cdp)?;

        let script_identifier =
            register_on_new_document_script(&connection, &session_id, &world_name).await;

        let frame_tree: GetFrameTreeResult = connection
            .send_command("Page.getFrameTree", None::<()>, Some(&session_id))
            .await
            .map_err(BridgeError::Cdp)?;
        let main_frame_id = frame_tree.frame_tree.frame.id;
        frames.lock().entry(main_frame_id.clone()).or_default();

        Ok(Self {
            connection,
            session_id,
            main_frame_id,
            world_name,
            fast_path_timeout,
            bridge_config,
            script_identifier: Mutex::new(script_identifier),
            frames,
        })
    }

    pub fn main_frame_id(&self) -> &str {
        &self.main_frame_id
    }

    /// Direct child frames of the main frame, in document order — the same
    /// order the Snapshot Generator numbers `f<k>` placeholders in.
    pub async fn child_frame_ids(&self) -> Result<Vec<String>, BridgeError> {
        let frame_tree: GetFrameTreeResult = self
            .connection
            .send_command("Page.getFrameTree", None::<()>, Some(&self.session_id))
            .await
            .map_err(BridgeError::Cdp)?;
        Ok(frame_tree
            .frame_tree
            .child_frames
            .unwrap_or_default()
            .into_iter()
            .map(|child| child.frame.id)
            .collect())
    }

    /// Await (or create) the named isolated world's execution context for `frame_id`.
    pub async fn ensure_frame_state(&self, frame_id: &str) -> Result<ExecutionContextId, BridgeError> {
        let rx = {
            let mut frames = self.frames.lock();
            let state = frames.entry(frame_id.to_string()).or_default();
            if let Some(context_id) = state.context_id {
                return Ok(context_id);
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            rx
        };

        match tokio::time::timeout(self.fast_path_timeout, rx).await {
            Ok(Ok(result)) => result,
            // Timed out waiting for the auto-injected world; fall back to an explicit
            // manual creation (the third tier of the injection fallback).
            _ => self.create_isolated_world(frame_id).await,
        }
    }

    async fn create_isolated_world(&self, frame_id: &str) -> Result<ExecutionContextId, BridgeError> {
        let result: CreateIsolatedWorldResult = self
            .connection
            .send_command(
                "Page.createIsolatedWorld",
                Some(CreateIsolatedWorldParams {
                    frame_id: frame_id.to_string(),
                    world_name: Some(self.world_name.clone()),
                    grant_univeral_access: Some(true),
                }),
                Some(&self.session_id),
            )
            .await
            .map_err(|e| BridgeError::FrameInjectionError {
                frame_id: frame_id.to_string(),
                reason: e.to_string(),
            })?;

        self.connection
            .send_command::<_, serde_json::Value>(
                "Runtime.evaluate",
                Some(verdex_cdp::protocol::runtime::EvaluateParams {
                    expression: bridge_bundle_js().to_string(),
                    object_group: None,
                    include_command_line_api: None,
                    silent: Some(true),
                    context_id: Some(result.execution_context_id),
                    return_by_value: Some(true),
                    await_promise: Some(false),
                }),
                Some(&self.session_id),
            )
            .await
            .map_err(|e| BridgeError::FrameInjectionError {
                frame_id: frame_id.to_string(),
                reason: e.to_string(),
            })?;

        let mut frames = self.frames.lock();
        let state = frames.entry(frame_id.to_string()).or_default();
        state.context_id = Some(result.execution_context_id);
        Ok(result.execution_context_id)
    }

    /// Call a method on the frame's Bridge instance, constructing it on first use.
    pub async fn call_bridge_method<R>(
        &self,
        frame_id: &str,
        method: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<R, BridgeError>
    where
        R: DeserializeOwned,
    {
        let context_id = self.ensure_frame_state(frame_id).await?;
        self.ensure_bridge_instance(frame_id, context_id).await?;

        let mut call_args = vec![CallArgument {
            value: Some(serde_json::Value::String(method.to_string())),
            unserializable_value: None,
            object_id: None,
        }];
        call_args.extend(args.into_iter().map(|v| CallArgument {
            value: Some(v),
            unserializable_value: None,
            object_id: None,
        }));

        let result: CallFunctionOnResult = self
            .connection
            .send_command(
                "Runtime.callFunctionOn",
                Some(CallFunctionOnParams {
                    function_declaration: dispatch::DISPATCH_FUNCTION.to_string(),
                    object_id: None,
                    arguments: Some(call_args),
                    silent: Some(true),
                    return_by_value: Some(true),
                    generate_preview: None,
                    user_gesture: None,
                    await_promise: Some(true),
                    execution_context_id: Some(context_id),
                    object_group: None,
                    throw_on_side_effect: None,
                    unique_context_id: None,
                    serialization_options: None,
                }),
                Some(&self.session_id),
            )
            .await
            .map_err(BridgeError::Cdp)?;

        if let Some(exception) = result.exception_details {
            let message = exception.exception.and_then(|o| o.description).unwrap_or(exception.text);
            return Err(parse_bridge_exception(message));
        }

        let value = result.result.value.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(value).map_err(|e| BridgeError::Cdp(e.into()))
    }

    async fn ensure_bridge_instance(
        &self,
        frame_id: &str,
        context_id: ExecutionContextId,
    ) -> Result<(), BridgeError> {
        {
            let frames = self.frames.lock();
            if frames.get(frame_id).map(|s| s.bridge_ready).unwrap_or(false) {
                return Ok(());
            }
        }

        let result: CallFunctionOnResult = self
            .connection
            .send_command(
                "Runtime.callFunctionOn",
                Some(CallFunctionOnParams {
                    function_declaration: dispatch::ensure_bridge_function(&self.bridge_config),
                    object_id: None,
                    arguments: None,
                    silent: Some(true),
                    return_by_value: Some(true),
                    generate_preview: None,
                    user_gesture: None,
                    await_promise: Some(false),
                    execution_context_id: Some(context_id),
                    object_group: None,
                    throw_on_side_effect: None,
                    unique_context_id: None,
                    serialization_options: None,
                }),
                Some(&self.session_id),
            )
            .await
            .map_err(BridgeError::Cdp)?;

        if let Some(exception) = result.exception_details {
            let message = exception.exception.and_then(|o| o.description).unwrap_or(exception.text);
            if let Some(found) = message.strip_prefix("verdex-bridge-version-mismatch:") {
                return Err(BridgeError::BridgeVersionMismatch {
                    frame_id: frame_id.to_string(),
                    expected: BRIDGE_VERSION.to_string(),
                    found: found.to_string(),
                });
            }
            return Err(BridgeError::FrameInjectionError {
                frame_id: frame_id.to_string(),
                reason: message,
            });
        }

        let mut frames = self.frames.lock();
        if let Some(state) = frames.get_mut(frame_id) {
            state.bridge_ready = true;
        }
        Ok(())
    }

    /// Unregister the on-new-document script, drop every frame state (rejecting
    /// any pending latches), and stop handling events for this session.
    /// Idempotent: safe to call more than once.
    pub async fn dispose(&self) {
        let identifier = self.script_identifier.lock().take();
        if let Some(identifier) = identifier {
            if let Err(err) = self
                .connection
                .send_command::<_, serde_json::Value>(
                    "Page.removeScriptToEvaluateOnNewDocument",
                    Some(RemoveScriptToEvaluateOnNewDocumentParams { identifier }),
                    Some(&self.session_id),
                )
                .await
            {
                warn!(error = %err, "failed to unregister Bridge on-new-document script");
            }
        }

        let mut frames = self.frames.lock();
        for (_, mut state) in frames.drain() {
            for waiter in state.waiters.drain(..) {
                let _ = waiter.send(Err(BridgeError::FrameDetached("session disposed".to_string())));
            }
        }
    }
}

async fn register_on_new_document_script(
    connection: &Arc<CdpConnection>,
    session_id: &str,
    world_name: &str,
) -> Option<String> {
    let source = bridge_bundle_js().to_string();

    let with_run_immediately = connection
        .send_command::<_, verdex_cdp::protocol::page::AddScriptToEvaluateOnNewDocumentResult>(
            "Page.addScriptToEvaluateOnNewDocument",
            Some(AddScriptToEvaluateOnNewDocumentParams {
                source: source.clone(),
                world_name: Some(world_name.to_string()),
                include_command_line_api: None,
                run_immediately: Some(true),
            }),
            Some(session_id),
        )
        .await;

    if let Ok(result) = with_run_immediately {
        return Some(result.identifier);
    }
    debug!("runImmediately on-new-document script rejected, retrying without it");

    let without_run_immediately = connection
        .send_command::<_, verdex_cdp::protocol::page::AddScriptToEvaluateOnNewDocumentResult>(
            "Page.addScriptToEvaluateOnNewDocument",
            Some(AddScriptToEvaluateOnNewDocumentParams {
                source,
                world_name: Some(world_name.to_string()),
                include_command_line_api: None,
                run_immediately: None,
            }),
            Some(session_id),
        )
        .await;

    match without_run_immediately {
        Ok(result) => Some(result.identifier),
        Err(err) => {
            // Manual per-navigation re-injection tier: ensure_frame_state's
            // explicit Page.createIsolatedWorld fallback covers this case.
            warn!(error = %err, "failed to register Bridge on-new-document script, relying on manual injection");
            None
        }
    }
}

/// Payload of a `_resolve` failure, JSON-encoded after the
/// `verdex-bridge-error:` prefix so the host can recover a typed
/// [`BridgeError`] instead of a free-text exception message.
#[derive(Deserialize)]
struct BridgeExceptionPayload {
    kind: String,
    #[serde(rename = "ref")]
    element_ref: Option<String>,
    role: Option<String>,
    name: Option<String>,
}

/// Recovers [`BridgeError::ElementNotFound`]/[`BridgeError::StaleElement`]
/// from a `_resolve` failure's `verdex-bridge-error:` prefix; anything else
/// (a method body's own thrown error, a syntax error) is forwarded as
/// [`BridgeError::BridgeMethodException`] verbatim.
fn parse_bridge_exception(message: String) -> BridgeError {
    let first_line = message.lines().next().unwrap_or(&message);
    let candidate = first_line
        .strip_prefix("Uncaught Error: ")
        .or_else(|| first_line.strip_prefix("Error: "))
        .unwrap_or(first_line);

    if let Some(payload) = candidate.strip_prefix("verdex-bridge-error:") {
        if let Ok(parsed) = serde_json::from_str::<BridgeExceptionPayload>(payload) {
            match parsed.kind.as_str() {
                "ElementNotFound" => {
                    return BridgeError::ElementNotFound(parsed.element_ref.unwrap_or_default())
                }
                "StaleElement" => {
                    return BridgeError::StaleElement {
                        ref_: parsed.element_ref.unwrap_or_default(),
                        role: parsed.role.unwrap_or_default(),
                        name: parsed.name.unwrap_or_default(),
                    }
                }
                _ => {}
            }
        }
    }

    BridgeError::BridgeMethodException(message)
}

fn handle_context_created(
    frames: &Arc<Mutex<HashMap<String, FrameState>>>,
    world_name: &str,
    event: ExecutionContextCreatedEvent,
) {
    let context = event.context;
    let Some(aux_data) = context.aux_data else {
        return;
    };
    if aux_data.is_default.unwrap_or(true) {
        return;
    }
    if context.name != world_name {
        return;
    }
    let Some(frame_id) = aux_data.frame_id else {
        return;
    };

    let mut frames = frames.lock();
    let state = frames.entry(frame_id).or_default();
    state.context_id = Some(context.id);
    for waiter in state.waiters.drain(..) {
        let _ = waiter.send(Ok(context.id));
    }
}

fn handle_context_destroyed(
    frames: &Arc<Mutex<HashMap<String, FrameState>>>,
    event: ExecutionContextDestroyedEvent,
) {
    let mut frames = frames.lock();
    for state in frames.values_mut() {
        if state.context_id == Some(event.execution_context_id) {
            state.context_id = None;
            state.bridge_ready = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_state_defaults_to_unready() {
        let state = FrameState::default();
        assert!(state.context_id.is_none());
        assert!(!state.bridge_ready);
        assert!(state.waiters.is_empty());
    }
}
