//! A role's browser context: its target, session, main frame, and Bridge Injector.
//!
//! The default role shares the browser's default context (no
//! `browserContextId`); every other role gets a fresh isolated context with
//! independent cookies and storage, created lazily the first time it is
//! selected.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use verdex_cdp::protocol::network_cookies::{CookieParam, CookieSameSite, SetCookiesParams};
use verdex_cdp::protocol::page::SetLifecycleEventsEnabledParams;
use verdex_cdp::protocol::runtime::EvaluateParams;
use verdex_cdp::protocol::target_domain::{
    AttachToTargetParams, AttachToTargetResult, CreateTargetParams, CreateTargetResult,
};
use verdex_cdp::CdpConnection;

use crate::browser::Browser;
use crate::error::RuntimeError;
use crate::injector::BridgeInjector;
use crate::runtime::RuntimeConfig;

/// A single cookie entry from an auth-state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: Option<String>,
}

/// A single storage entry (localStorage or sessionStorage item).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

/// Per-origin storage entries from an auth-state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginStorage {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
    #[serde(default)]
    pub session_storage: Vec<StorageEntry>,
}

/// Auth state: cookies plus per-origin storage, loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(default)]
    pub cookies: Vec<AuthCookie>,
    #[serde(default)]
    pub origins: Vec<OriginStorage>,
}

impl AuthState {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Static configuration for a role, parsed from the `--role` CLI triple.
#[derive(Debug, Clone)]
pub struct RoleConfig {
    pub name: String,
    pub auth_state_path: Option<std::path::PathBuf>,
    pub default_url: Option<url::Url>,
}

/// A role's isolated (or default) browser context, page, and Bridge Injector.
pub struct RoleContext {
    pub role: String,
    browser_context_id: Option<String>,
    target_id: String,
    session_id: String,
    main_frame_id: String,
    pub injector: BridgeInjector,
    pub default_url: Option<url::Url>,
    created_at: DateTime<Utc>,
    last_used: std::sync::Mutex<DateTime<Utc>>,
    has_navigated: std::sync::atomic::AtomicBool,
    /// Direct child frame ids, indexed by the `f<k>` ordinal the Snapshot
    /// Generator most recently assigned them (`frame_index[0]` is `f1`).
    /// Repopulated on every `snapshot` call; stale between snapshots if the
    /// page's frames have changed since.
    frame_index: std::sync::Mutex<Vec<String>>,
}

impl RoleContext {
    /// Create the default role's context against the browser's shared, default
    /// browsing context (no isolation). Reuses the browser's own initial tab
    /// rather than opening a fresh one, the first time the default role is
    /// selected.
    pub async fn create_default(
        browser: &Browser,
        config: &RoleConfig,
        runtime_config: &RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        if let Some(target_id) = browser.take_initial_target_id() {
            return Self::attach(browser, config, runtime_config, target_id, None).await;
        }
        Self::create(browser, config, runtime_config, None).await
    }

    /// Create a non-default role's context in a fresh, isolated browser context.
    pub async fn create_isolated(
        browser: &Browser,
        config: &RoleConfig,
        runtime_config: &RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        let context_id = browser
            .new_browser_context()
            .await
            .map_err(|e| RuntimeError::RoleInitError {
                role: config.name.clone(),
                reason: e.to_string(),
            })?;
        Self::create(browser, config, runtime_config, Some(context_id)).await
    }

    async fn create(
        browser: &Browser,
        config: &RoleConfig,
        runtime_config: &RuntimeConfig,
        browser_context_id: Option<String>,
    ) -> Result<Self, RuntimeError> {
        let connection = browser.connection().clone();

        let create_target_result: CreateTargetResult = connection
            .send_command(
                "Target.createTarget",
                Some(CreateTargetParams {
                    url: "about:blank".to_string(),
                    width: None,
                    height: None,
                    browser_context_id: browser_context_id.clone(),
                    background: None,
                    new_window: None,
                }),
                None,
            )
            .await
            .map_err(|e| RuntimeError::RoleInitError {
                role: config.name.clone(),
                reason: e.to_string(),
            })?;

        Self::attach(browser, config, runtime_config, create_target_result.target_id, browser_context_id).await
    }

    /// Attach to an already-existing target (either one `create` just opened,
    /// or the browser's own initial tab) and finish role setup against it.
    async fn attach(
        browser: &Browser,
        config: &RoleConfig,
        runtime_config: &RuntimeConfig,
        target_id: String,
        browser_context_id: Option<String>,
    ) -> Result<Self, RuntimeError> {
        let connection = browser.connection().clone();

        let attach_result: AttachToTargetResult = connection
            .send_command(
                "Target.attachToTarget",
                Some(AttachToTargetParams {
                    target_id: target_id.clone(),
                    flatten: Some(true),
                }),
                None,
            )
            .await
            .map_err(|e| RuntimeError::RoleInitError {
                role: config.name.clone(),
                reason: e.to_string(),
            })?;
        let session_id = attach_result.session_id;

        for method in ["Page.enable", "Network.enable", "DOM.enable"] {
            connection
                .send_command::<(), serde_json::Value>(method, None, Some(&session_id))
                .await
                .map_err(|e| RuntimeError::RoleInitError {
                    role: config.name.clone(),
                    reason: e.to_string(),
                })?;
        }
        connection
            .send_command::<_, serde_json::Value>(
                "Page.setLifecycleEventsEnabled",
                Some(SetLifecycleEventsEnabledParams { enabled: true }),
                Some(&session_id),
            )
            .await
            .map_err(|e| RuntimeError::RoleInitError {
                role: config.name.clone(),
                reason: e.to_string(),
            })?;

        let injector = BridgeInjector::new(
            connection.clone(),
            session_id.clone(),
            runtime_config.isolated_world_name.clone(),
            runtime_config.isolated_world_fast_path_timeout,
            runtime_config.bridge_config,
        )
        .await
        .map_err(|e| RuntimeError::RoleInitError {
            role: config.name.clone(),
            reason: e.to_string(),
        })?;
        let main_frame_id = injector.main_frame_id().to_string();

        let now = Utc::now();
        let ctx = Self {
            role: config.name.clone(),
            browser_context_id,
            target_id,
            session_id: session_id.clone(),
            main_frame_id,
            injector,
            default_url: config.default_url.clone(),
            created_at: now,
            last_used: std::sync::Mutex::new(now),
            has_navigated: std::sync::atomic::AtomicBool::new(false),
            frame_index: std::sync::Mutex::new(Vec::new()),
        };

        if let Some(path) = &config.auth_state_path {
            match tokio::fs::read_to_string(path).await {
                Ok(text) => match AuthState::from_json(&text) {
                    Ok(state) => {
                        if let Err(err) = ctx.apply_auth_state(&connection, &state).await {
                            warn!(role = %config.name, error = %err, "failed to apply auth state");
                        }
                    }
                    Err(err) => {
                        warn!(role = %config.name, error = %err, "auth state file is not valid JSON");
                    }
                },
                Err(err) => {
                    warn!(role = %config.name, path = %path.display(), error = %err, "auth state file unreadable, role stays anonymous");
                }
            }
        }

        Ok(ctx)
    }

    async fn apply_auth_state(
        &self,
        connection: &Arc<CdpConnection>,
        state: &AuthState,
    ) -> Result<(), RuntimeError> {
        if !state.cookies.is_empty() {
            let cookies: Vec<CookieParam> = state
                .cookies
                .iter()
                .map(|c| {
                    let mut param = CookieParam::new(c.name.clone(), c.value.clone())
                        .domain(c.domain.clone())
                        .path(c.path.clone())
                        .secure(c.secure)
                        .http_only(c.http_only);
                    if let Some(expires) = c.expires {
                        param = param.expires(expires);
                    }
                    if let Some(same_site) = same_site_from_str(c.same_site.as_deref()) {
                        param = param.same_site(same_site);
                    }
                    param
                })
                .collect();

            connection
                .send_command::<_, serde_json::Value>(
                    "Network.setCookies",
                    Some(SetCookiesParams { cookies }),
                    Some(&self.session_id),
                )
                .await
                .map_err(|e| RuntimeError::RoleInitError {
                    role: self.role.clone(),
                    reason: e.to_string(),
                })?;
            debug!(role = %self.role, count = state.cookies.len(), "applied auth-state cookies");
        }

        for origin in &state.origins {
            if origin.local_storage.is_empty() && origin.session_storage.is_empty() {
                continue;
            }
            connection
                .send_command::<_, serde_json::Value>(
                    "Page.navigate",
                    Some(verdex_cdp::protocol::page::NavigateParams {
                        url: origin.origin.clone(),
                        referrer: None,
                        transition_type: None,
                        frame_id: None,
                    }),
                    Some(&self.session_id),
                )
                .await
                .map_err(|e| RuntimeError::RoleInitError {
                    role: self.role.clone(),
                    reason: e.to_string(),
                })?;
            tokio::time::sleep(Duration::from_millis(200)).await;

            let local_json = serde_json::to_string(&origin.local_storage).unwrap_or_default();
            let session_json = serde_json::to_string(&origin.session_storage).unwrap_or_default();
            let js = format!(
                r"(function() {{
                    const local = {local_json};
                    for (const entry of local) localStorage.setItem(entry.name, entry.value);
                    const session = {session_json};
                    for (const entry of session) sessionStorage.setItem(entry.name, entry.value);
                }})()"
            );
            connection
                .send_command::<_, serde_json::Value>(
                    "Runtime.evaluate",
                    Some(EvaluateParams {
                        expression: js,
                        object_group: None,
                        include_command_line_api: None,
                        silent: Some(true),
                        context_id: None,
                        return_by_value: Some(true),
                        await_promise: Some(false),
                    }),
                    Some(&self.session_id),
                )
                .await
                .map_err(|e| RuntimeError::RoleInitError {
                    role: self.role.clone(),
                    reason: e.to_string(),
                })?;
            debug!(role = %self.role, origin = %origin.origin, "applied auth-state storage");
        }

        Ok(())
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn main_frame_id(&self) -> &str {
        &self.main_frame_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn touch(&self) {
        *self.last_used.lock().unwrap() = Utc::now();
    }

    pub fn last_used(&self) -> DateTime<Utc> {
        *self.last_used.lock().unwrap()
    }

    pub fn mark_navigated(&self) {
        self.has_navigated
            .store(true, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn has_navigated(&self) -> bool {
        self.has_navigated.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Record the child frame ids found by the most recent snapshot, in `f<k>` order.
    pub fn set_frame_index(&self, frame_ids: Vec<String>) {
        *self.frame_index.lock().unwrap() = frame_ids;
    }

    /// Look up the frame id for a 1-based `f<k>` ordinal from the last snapshot.
    pub fn frame_id_for_index(&self, ordinal: usize) -> Option<String> {
        self.frame_index.lock().unwrap().get(ordinal.checked_sub(1)?).cloned()
    }

    /// Detach, close the target, and (if isolated) dispose the browser context.
    /// Errors are logged and swallowed, per the close operation's contract.
    pub async fn close(&self, connection: &Arc<CdpConnection>) {
        if let Err(err) = connection
            .send_command::<_, serde_json::Value>(
                "Target.detachFromTarget",
                Some(verdex_cdp::protocol::target_domain::DetachFromTargetParams {
                    session_id: Some(self.session_id.clone()),
                }),
                None,
            )
            .await
        {
            warn!(role = %self.role, error = %err, "failed to detach session while closing role");
        }

        if let Err(err) = connection
            .send_command::<_, serde_json::Value>(
                "Target.closeTarget",
                Some(verdex_cdp::protocol::target_domain::CloseTargetParams {
                    target_id: self.target_id.clone(),
                }),
                None,
            )
            .await
        {
            warn!(role = %self.role, error = %err, "failed to close target while closing role");
        }

        if let Some(context_id) = &self.browser_context_id {
            if let Err(err) = connection
                .send_command::<_, serde_json::Value>(
                    "Target.disposeBrowserContext",
                    Some(verdex_cdp::protocol::target_domain::DisposeBrowserContextParams {
                        browser_context_id: context_id.clone(),
                    }),
                    None,
                )
                .await
            {
                warn!(role = %self.role, error = %err, "failed to dispose browser context while closing role");
            }
        }
    }
}

fn same_site_from_str(value: Option<&str>) -> Option<CookieSameSite> {
    match value {
        Some("Strict") => Some(CookieSameSite::Strict),
        Some("Lax") => Some(CookieSameSite::Lax),
        Some("None") => Some(CookieSameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_state_parses_minimal_json() {
        let json = r#"{
            "cookies": [{"name": "sid", "value": "abc", "domain": ".example.com", "path": "/", "httpOnly": true, "secure": true}],
            "origins": [{"origin": "https://example.com", "localStorage": [{"name": "k", "value": "v"}]}]
        }"#;
        let state = AuthState::from_json(json).unwrap();
        assert_eq!(state.cookies.len(), 1);
        assert_eq!(state.origins[0].local_storage[0].name, "k");
        assert!(state.origins[0].session_storage.is_empty());
    }

    #[test]
    fn auth_state_defaults_to_empty_on_missing_fields() {
        let state = AuthState::from_json("{}").unwrap();
        assert!(state.cookies.is_empty());
        assert!(state.origins.is_empty());
    }
}
