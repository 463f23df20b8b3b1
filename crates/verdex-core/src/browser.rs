//! Browser process launching and the single process-wide [`Browser`] handle.
//!
//! The Multi-Context Runtime owns exactly one `Browser`: a connected CDP
//! session plus, if we spawned it, the child process. Role contexts are
//! created against this single browser via `Target.createBrowserContext`.

use std::env;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, instrument, trace, warn};

use verdex_cdp::protocol::target_domain::{
    CreateBrowserContextParams, CreateBrowserContextResult, GetTargetsResult,
};
use verdex_cdp::CdpConnection;

use crate::error::BrowserError;

const DEFAULT_LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);

const CHROMIUM_PATHS: &[&str] = &[
    "chromium",
    "chromium-browser",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

/// Where the browser keeps its profile data.
#[derive(Debug, Clone)]
pub enum UserDataDir {
    /// A fresh temporary directory per run, removed on drop.
    Temp,
    /// A caller-chosen directory that persists across runs.
    Persist(PathBuf),
    /// The system default profile; no `--user-data-dir` flag is passed.
    System,
}

impl Default for UserDataDir {
    fn default() -> Self {
        Self::Temp
    }
}

/// Builder for launching the browser process.
#[derive(Debug, Clone, Default)]
pub struct BrowserBuilder {
    executable_path: Option<PathBuf>,
    headless: bool,
    args: Vec<String>,
    timeout: Option<Duration>,
    user_data_dir: UserDataDir,
}

impl BrowserBuilder {
    pub fn new() -> Self {
        Self {
            headless: true,
            timeout: None,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_data_dir = UserDataDir::Persist(path.into());
        self
    }

    #[must_use]
    pub fn user_data_dir_system(mut self) -> Self {
        self.user_data_dir = UserDataDir::System;
        self
    }

    #[instrument(level = "info", skip(self), fields(headless = self.headless))]
    pub async fn launch(self) -> Result<Browser, BrowserError> {
        let launch_timeout = self.timeout.unwrap_or(DEFAULT_LAUNCH_TIMEOUT);
        info!("launching browser");

        let executable = find_executable(self.executable_path.as_deref())?;
        info!(executable = %executable.display(), "found Chromium executable");

        let (user_data_path, temp_dir) = match &self.user_data_dir {
            UserDataDir::Temp => {
                let dir = TempDir::with_prefix("verdex-browser-")
                    .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
                let path = dir.path().to_path_buf();
                (Some(path), Some(dir))
            }
            UserDataDir::Persist(path) => (Some(path.clone()), None),
            UserDataDir::System => (None, None),
        };

        let mut cmd = Command::new(&executable);
        cmd.arg("--remote-debugging-port=0");
        if self.headless {
            cmd.arg("--headless=new");
        }

        let stability_args = [
            "--disable-background-networking",
            "--disable-background-timer-throttling",
            "--disable-backgrounding-occluded-windows",
            "--disable-breakpad",
            "--disable-component-extensions-with-background-pages",
            "--disable-component-update",
            "--disable-default-apps",
            "--disable-dev-shm-usage",
            "--disable-extensions",
            "--disable-features=TranslateUI",
            "--disable-hang-monitor",
            "--disable-ipc-flooding-protection",
            "--disable-popup-blocking",
            "--disable-prompt-on-repost",
            "--disable-renderer-backgrounding",
            "--disable-sync",
            "--enable-features=NetworkService,NetworkServiceInProcess",
            "--force-color-profile=srgb",
            "--metrics-recording-only",
            "--no-first-run",
            "--password-store=basic",
            "--use-mock-keychain",
        ];
        cmd.args(stability_args);

        if let Some(ref dir) = user_data_path {
            cmd.arg(format!("--user-data-dir={}", dir.display()));
        }
        if !self.args.is_empty() {
            cmd.args(&self.args);
        }

        cmd.stderr(Stdio::piped());
        cmd.stdout(Stdio::null());

        let mut child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
        let pid = child.id();
        info!(pid, "Chromium process spawned");

        let ws_url = timeout(launch_timeout, read_ws_url(&mut child))
            .await
            .map_err(|_| {
                warn!(timeout_ms = launch_timeout.as_millis(), "browser launch timed out");
                BrowserError::LaunchTimeout(launch_timeout)
            })??;

        debug!(ws_url = %ws_url, "connecting to browser via CDP");
        let connection = CdpConnection::connect(&ws_url).await?;
        let initial_target_id = fetch_initial_target_id(&connection).await;

        // Keep temp_dir alive until the browser is dropped.
        std::mem::forget(temp_dir);

        Ok(Browser {
            connection: Arc::new(connection),
            process: Some(Mutex::new(child)),
            owned: true,
            initial_target_id: std::sync::Mutex::new(initial_target_id),
        })
    }
}

fn find_executable(explicit: Option<&std::path::Path>) -> Result<PathBuf, BrowserError> {
    if let Some(path) = explicit {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(BrowserError::ChromiumNotFound)
        };
    }

    if let Ok(path_str) = env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(&path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    for candidate in CHROMIUM_PATHS {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(path);
        }
        if let Ok(output) = Command::new("which").arg(candidate).output() {
            if output.status.success() {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    Err(BrowserError::ChromiumNotFound)
}

async fn read_ws_url(child: &mut Child) -> Result<String, BrowserError> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| BrowserError::LaunchFailed("failed to capture stderr".into()))?;

    let handle = tokio::task::spawn_blocking(move || {
        let reader = BufReader::new(stderr);
        for line in reader.lines() {
            let Ok(line) = line else { continue };
            trace!(line = %line, "Chromium stderr");
            if let Some(pos) = line.find("DevTools listening on ") {
                return Some(line[pos + 22..].trim().to_string());
            }
        }
        None
    });

    handle
        .await
        .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?
        .ok_or_else(|| BrowserError::LaunchFailed("no DevTools WebSocket URL in browser output".into()))
}

/// The id of the page target Chromium opens on its own at startup, if any —
/// the default role reuses this tab instead of opening a fresh one.
async fn fetch_initial_target_id(connection: &CdpConnection) -> Option<String> {
    let result: Result<GetTargetsResult, _> = connection
        .send_command("Target.getTargets", None::<()>, None)
        .await;
    match result {
        Ok(result) => result
            .target_infos
            .into_iter()
            .find(|target| target.target_type == "page" && target.browser_context_id.is_none())
            .map(|target| target.target_id),
        Err(err) => {
            warn!(error = %err, "failed to list targets after launch, default role will open a fresh tab");
            None
        }
    }
}

/// A running browser, either spawned by us or connected to.
#[derive(Debug)]
pub struct Browser {
    connection: Arc<CdpConnection>,
    process: Option<Mutex<Child>>,
    owned: bool,
    initial_target_id: std::sync::Mutex<Option<String>>,
}

impl Browser {
    pub fn launch() -> BrowserBuilder {
        BrowserBuilder::new()
    }

    pub async fn connect(ws_url: &str) -> Result<Self, BrowserError> {
        let connection = CdpConnection::connect(ws_url).await?;
        let initial_target_id = fetch_initial_target_id(&connection).await;
        Ok(Self {
            connection: Arc::new(connection),
            process: None,
            owned: false,
            initial_target_id: std::sync::Mutex::new(initial_target_id),
        })
    }

    /// Takes the id of the browser's own initial tab, if nothing has claimed
    /// it yet. The default role uses this to reuse that tab rather than
    /// opening a fresh one via `Target.createTarget`.
    pub fn take_initial_target_id(&self) -> Option<String> {
        self.initial_target_id.lock().unwrap().take()
    }

    /// Create a fresh, isolated browser context (independent cookies/storage).
    pub async fn new_browser_context(&self) -> Result<String, BrowserError> {
        let result: CreateBrowserContextResult = self
            .connection
            .send_command(
                "Target.createBrowserContext",
                Some(CreateBrowserContextParams::default()),
                None,
            )
            .await?;
        Ok(result.browser_context_id)
    }

    pub fn connection(&self) -> &Arc<CdpConnection> {
        &self.connection
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub async fn close(&self) -> Result<(), BrowserError> {
        if let Some(process) = &self.process {
            let mut child = process.lock().await;
            let _ = child.kill();
        }
        Ok(())
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        if self.owned {
            if let Some(process) = &self.process {
                if let Ok(mut guard) = process.try_lock() {
                    let _ = guard.kill();
                }
            }
        }
    }
}
