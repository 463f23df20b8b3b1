//! CLI entry point: launches the Multi-Context Runtime and reads operation
//! requests as newline-delimited JSON on stdin, writing JSON responses to
//! stdout. One role, `default`, always exists; `--role` registers additional
//! named roles with their own auth state and optional starting URL.

use std::io::Write as _;

use clap::{Arg, ArgAction, Command};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use verdex_core::role_context::RoleConfig;
use verdex_core::runtime::{RuntimeConfig, VerdexRuntime};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    Navigate { url: String },
    Snapshot,
    Click { element_ref: String },
    Type { element_ref: String, text: String },
    Inspect { element_ref: String },
    ResolveContainer { element_ref: String },
    InspectPattern { element_ref: String, ancestor_level: u32 },
    ExtractAnchors { element_ref: String, ancestor_level: u32 },
    GetCurrentRole,
    ListCurrentRoles,
    SelectRole { role: String },
    Wait { milliseconds: Option<u64> },
    Close,
}

fn cli() -> Command {
    Command::new("verdex")
        .about("Browser automation bridge for LLM agents")
        .arg(
            Arg::new("role")
                .long("role")
                .num_args(2..=3)
                .action(ArgAction::Append)
                .value_names(["NAME", "AUTH_FILE", "DEFAULT_URL"])
                .help("Register a role: name, auth-state file, optional default URL"),
        )
        .arg(
            Arg::new("headed")
                .long("headed")
                .action(ArgAction::SetTrue)
                .help("Run the browser with a visible window"),
        )
}

fn parse_role_configs(matches: &clap::ArgMatches) -> Vec<RoleConfig> {
    let Some(occurrences) = matches.get_occurrences::<String>("role") else {
        return Vec::new();
    };

    occurrences
        .map(|values| {
            let values: Vec<String> = values.cloned().collect();
            let name = values[0].clone();
            let auth_state_path = Some(std::path::PathBuf::from(&values[1]));
            let default_url = values.get(2).and_then(|raw| url::Url::parse(raw).ok());
            if values.len() > 2 && default_url.is_none() {
                tracing::warn!(role = %name, value = %values[2], "default-url does not parse as a URL, ignoring");
            }
            RoleConfig {
                name,
                auth_state_path,
                default_url,
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let role_configs = parse_role_configs(&matches);
    let headless = !matches.get_flag("headed");

    let runtime = match VerdexRuntime::launch(
        RuntimeConfig {
            headless,
            ..Default::default()
        },
        role_configs,
    )
    .await
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to launch runtime: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let stdout = std::io::stdout();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&runtime, &line).await;
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{response}");
    }

    runtime.close().await;
    std::process::ExitCode::SUCCESS
}

async fn handle_line(runtime: &VerdexRuntime, line: &str) -> String {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => return serde_json::json!({"error": err.to_string()}).to_string(),
    };

    let result = dispatch(runtime, request).await;
    match result {
        Ok(value) => value.to_string(),
        Err(err) => serde_json::json!({"error": err.to_string()}).to_string(),
    }
}

async fn dispatch(
    runtime: &VerdexRuntime,
    request: Request,
) -> Result<serde_json::Value, verdex_core::error::RuntimeError> {
    use serde_json::json;

    let value = match request {
        Request::Navigate { url } => json!(runtime.navigate(&url).await?),
        Request::Snapshot => json!(runtime.snapshot().await?),
        Request::Click { element_ref } => json!(runtime.click(&element_ref).await?),
        Request::Type { element_ref, text } => json!(runtime.type_text(&element_ref, &text).await?),
        Request::Inspect { element_ref } => json!(runtime.inspect(&element_ref).await?),
        Request::ResolveContainer { element_ref } => json!(runtime.resolve_container(&element_ref).await?),
        Request::InspectPattern { element_ref, ancestor_level } => {
            json!(runtime.inspect_pattern(&element_ref, ancestor_level).await?)
        }
        Request::ExtractAnchors { element_ref, ancestor_level } => {
            json!(runtime.extract_anchors(&element_ref, ancestor_level).await?)
        }
        Request::GetCurrentRole => json!({"role": runtime.get_current_role().await}),
        Request::ListCurrentRoles => {
            let (configured, active) = runtime.list_current_roles().await;
            json!({"configured": configured, "active": active})
        }
        Request::SelectRole { role } => {
            runtime.select_role(&role).await?;
            json!({"role": role})
        }
        Request::Wait { milliseconds } => {
            runtime.wait(milliseconds).await;
            json!({"waited": true})
        }
        Request::Close => {
            runtime.close().await;
            json!({"closed": true})
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_triple_parses_name_auth_path_and_url() {
        let matches = cli()
            .try_get_matches_from(["verdex", "--role", "admin", "auth.json", "https://example.com"])
            .unwrap();
        let configs = parse_role_configs(&matches);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "admin");
        assert_eq!(configs[0].default_url.as_ref().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn role_pair_without_default_url_leaves_it_unset() {
        let matches = cli()
            .try_get_matches_from(["verdex", "--role", "viewer", "viewer-auth.json"])
            .unwrap();
        let configs = parse_role_configs(&matches);
        assert_eq!(configs.len(), 1);
        assert!(configs[0].default_url.is_none());
    }

    #[test]
    fn multiple_role_flags_produce_one_config_each() {
        let matches = cli()
            .try_get_matches_from([
                "verdex", "--role", "admin", "a.json", "--role", "viewer", "v.json",
            ])
            .unwrap();
        let configs = parse_role_configs(&matches);
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].name, "admin");
        assert_eq!(configs[1].name, "viewer");
    }
}
