use anyhow::{Context, Result};
use dirs::{config_dir, data_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "lp-matrix";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per document.
    #[default]
    Json,
    /// All documents in a single SQLite database.
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where documents and recordings live. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub storage: StorageBackend,
    /// Recording file name, relative to the data directory.
    pub recording_file: String,
    /// Program and arguments that write raw mono S16LE 44.1 kHz PCM to stdout.
    pub capture_command: Vec<String>,
    /// Program and arguments that play raw mono S16LE 44.1 kHz PCM from stdin.
    pub playback_command: Vec<String>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage: StorageBackend::Json,
            recording_file: "recording.wav".to_string(),
            capture_command: raw_pcm_command("arecord"),
            playback_command: raw_pcm_command("aplay"),
            window_width: 1000.0,
            window_height: 700.0,
        }
    }
}

fn raw_pcm_command(program: &str) -> Vec<String> {
    [program, "-q", "-f", "S16_LE", "-c", "1", "-r", "44100", "-t", "raw"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl AppConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let loaded = get_config_path().and_then(|path| Self::load_or_create(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Reads `path`, first writing the defaults there if it does not exist yet so
    /// the file is easy to find and edit.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        log::info!("Wrote default configuration to {:?}", path);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn recording_path(&self) -> PathBuf {
        self.resolved_data_dir().join(&self.recording_file)
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path = config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
