//! Parsing of Cloud Foundry API payloads consulted before running a command.

use serde::Deserialize;

/// Remote working directory used when the app exposes no writable volume.
pub const DEFAULT_REMOTE_DIR: &str = "/tmp";

// ── /v3/apps/<guid>/env ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct AppEnv {
    #[serde(default)]
    system_env_json: SystemEnv,
}

#[derive(Debug, Default, Deserialize)]
struct SystemEnv {
    #[serde(rename = "VCAP_SERVICES", default)]
    vcap_services: VcapServices,
}

#[derive(Debug, Default, Deserialize)]
struct VcapServices {
    #[serde(rename = "fs-storage", default)]
    fs_storage: Vec<FsStorageService>,
}

#[derive(Debug, Deserialize)]
struct FsStorageService {
    #[serde(default)]
    volume_mounts: Vec<VolumeMount>,
}

#[derive(Debug, Deserialize)]
struct VolumeMount {
    container_dir: String,
    #[serde(default)]
    mode: String,
}

/// First read-write `fs-storage` volume mount in an app env payload.
///
/// # Errors
///
/// Returns an error if `body` is not valid JSON of the expected shape.
pub fn writable_volume(body: &str) -> Result<Option<String>, serde_json::Error> {
    let env: AppEnv = serde_json::from_str(body)?;
    Ok(env
        .system_env_json
        .vcap_services
        .fs_storage
        .into_iter()
        .flat_map(|service| service.volume_mounts)
        .find(|mount| mount.mode == "rw")
        .map(|mount| mount.container_dir))
}

// ── /v3/apps/<guid>/ssh_enabled ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SshEnabled {
    enabled: bool,
    #[serde(default)]
    reason: String,
}

/// Whether SSH is enabled, plus the reason the API gives when it is not.
///
/// # Errors
///
/// Returns an error if `body` is not valid JSON of the expected shape.
pub fn ssh_enabled(body: &str) -> Result<(bool, String), serde_json::Error> {
    let parsed: SshEnabled = serde_json::from_str(body)?;
    Ok((parsed.enabled, parsed.reason))
}

// ── `cf apps` table ──────────────────────────────────────────────────────────

/// App names listed by `cf apps`.
///
/// Returns `None` when no table header was found, which means the command
/// printed something else entirely (usually a login prompt).
#[must_use]
pub fn app_names(output: &[String]) -> Option<Vec<String>> {
    let header = output.iter().position(|line| {
        let cols: Vec<&str> = line.split_whitespace().collect();
        cols.first() == Some(&"name") && line.contains("requested state")
    })?;
    Some(
        output[header + 1..]
            .iter()
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect(),
    )
}
