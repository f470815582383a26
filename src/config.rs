use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::commands::Command;
use crate::format::DEFAULT_CURRENCY_CODE;
use crate::models::metadata::DEFAULT_MAX_METADATA_ENTRIES;
use crate::models::StressScale;

#[derive(Parser, Debug)]
#[command(name = "moodmentor", about = "Mood tracking and mentoring records")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub display: DisplayConfig,
    pub limits: LimitsConfig,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub stress_min: f64,
    pub stress_max: f64,
    pub metadata_entries: usize,
    pub list_limit: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let scale = StressScale::default();
        Self {
            stress_min: scale.min,
            stress_max: scale.max,
            metadata_entries: DEFAULT_MAX_METADATA_ENTRIES,
            list_limit: 50,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config: Config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref db) = cli.db {
            config.database.path = Some(db.clone());
        }

        // Resolve paths relative to data dir
        if config.database.path.is_none() {
            config.database.path = Some(data_dir.join("moodmentor.db"));
        }

        if config.limits.stress_min > config.limits.stress_max {
            anyhow::bail!(
                "limits.stress_min ({}) is greater than limits.stress_max ({})",
                config.limits.stress_min,
                config.limits.stress_max
            );
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".moodmentor")
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("moodmentor.db"))
    }

    pub fn stress_scale(&self) -> StressScale {
        StressScale {
            min: self.limits.stress_min,
            max: self.limits.stress_max,
        }
    }
}
