use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub catalog: Catalog,
    pub http: Http,
    pub log: Log,
    pub store: Store,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake"
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub backend: String, // "fake" or "mysql"
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    // both set: serve over TLS
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "fake" or "mysql"
    pub mysql_dsn: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_ansi() -> bool {
    true
}

fn default_max_connections() -> u32 {
    10
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Loads the TOML file, then applies `AFFINITY__SECTION__KEY` overrides.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix("AFFINITY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
