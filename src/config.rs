use std::{fs, io::ErrorKind, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

/// Environment variable that overrides the location of `config.toml`
pub const CONFIG_PATH_VAR: &str = "SHEET_BOT_CONFIG";

/// Top level bot configuration, read from `config.toml`
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    /// Reference API connection settings
    pub pokeapi: PokeApiConfig,

    /// Per-step reply timeouts and prompt settings
    pub workflow: WorkflowConfig,

    /// Record store connection, persistence is disabled without it
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Loads the configuration from `config.toml` (or `$SHEET_BOT_CONFIG`)
    /// A missing file yields the defaults, a malformed one is an error
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        match fs::read_to_string(&path) {
            Ok(raw) => Self::parse(&raw).with_context(|| format!("invalid {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("could not read {}", path.display())),
        }
    }

    /// Parses a configuration from TOML text
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Where the reference API lives and how long a single fetch may take
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PokeApiConfig {
    pub base_url: String,
    pub fetch_timeout_secs: u64,
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
            fetch_timeout_secs: 15,
        }
    }
}

impl PokeApiConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Settings of the interactive sheet workflow
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WorkflowConfig {
    pub form_timeout_secs: u64,
    pub ability_timeout_secs: u64,
    pub moves_timeout_secs: u64,
    pub shiny_timeout_secs: u64,

    /// Upper bound of moves a sheet can carry
    pub max_moves: usize,

    /// Languages tried first for ability names and effects, before English
    pub preferred_locales: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            form_timeout_secs: 60,
            ability_timeout_secs: 60,
            moves_timeout_secs: 120,
            shiny_timeout_secs: 30,
            max_moves: 4,
            preferred_locales: vec!["pt".to_string(), "pt-BR".to_string(), "es".to_string()],
        }
    }
}

/// neo4j connection settings
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
}

fn default_db_port() -> u16 {
    7687
}

impl DatabaseConfig {
    pub fn uri(&self) -> String {
        format!("neo4j://{}:{}", self.host, self.port)
    }
}
