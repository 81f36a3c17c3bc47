use anyhow::{anyhow, Context, Result};
use jsonc_parser::{parse_to_serde_value, ParseOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::time;

use crate::catalog::{Mood, Platform, Tone};
use crate::templates::FormatOptions;

const APP_NAME: &str = "captioncraft";
const WATCH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub default_platform: Platform,

    #[serde(default)]
    pub default_tone: Tone,

    #[serde(default)]
    pub default_mood: Mood,

    #[serde(default = "default_true")]
    pub include_hashtags: bool,

    #[serde(default = "default_true")]
    pub include_emojis: bool,

    #[serde(default)]
    pub include_cta: bool,

    /// Simulated latency before a batch shows up.
    #[serde(default = "default_generation_delay_ms")]
    pub generation_delay_ms: u64,

    #[serde(default = "default_copied_indicator_ms")]
    pub copied_indicator_ms: u64,

    /// Throw away a finished batch when the inputs changed while it was pending.
    #[serde(default)]
    pub drop_stale_generations: bool,
}

fn default_true() -> bool {
    true
}

fn default_generation_delay_ms() -> u64 {
    2500
}

fn default_copied_indicator_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_platform: Platform::default(),
            default_tone: Tone::default(),
            default_mood: Mood::default(),
            include_hashtags: true,
            include_emojis: true,
            include_cta: false,
            generation_delay_ms: default_generation_delay_ms(),
            copied_indicator_ms: default_copied_indicator_ms(),
            drop_stale_generations: false,
        }
    }
}

impl Config {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            hashtags: self.include_hashtags,
            emojis: self.include_emojis,
            call_to_action: self.include_cta,
        }
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    pub fn copied_indicator(&self) -> Duration {
        Duration::from_millis(self.copied_indicator_ms)
    }
}

#[derive(Clone)]
pub struct ConfigManager {
    inner: Arc<ConfigManagerInner>,
}

struct ConfigManagerInner {
    config: RwLock<Config>,
    config_path: PathBuf,
    change_tx: watch::Sender<Config>,
    watcher_active: AtomicBool,
}

enum Reload {
    Applied,
    Unchanged,
}

impl ConfigManagerInner {
    fn reload(&self) -> Result<Reload> {
        let fresh = ConfigManager::read_config_from_disk(&self.config_path)?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| anyhow!("Config lock poisoned"))?;
        if *guard == fresh {
            return Ok(Reload::Unchanged);
        }
        let previous = std::mem::replace(&mut *guard, fresh.clone());
        drop(guard);

        tracing::debug!(?previous, current = ?fresh, "Config watcher applied update");
        // Nobody listening is fine; `get` still sees the new value.
        let _ = self.change_tx.send(fresh);
        Ok(Reload::Applied)
    }
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("", "", APP_NAME)
            .context("Failed to get config directory")?
            .config_dir()
            .to_path_buf();

        Self::load_from_dir(&config_dir)
    }

    pub fn load_from_dir(config_dir: &Path) -> Result<Self> {
        fs::create_dir_all(config_dir).context("Failed to create config directory")?;

        let config_path = config_dir.join("config.jsonc");
        let config = if config_path.exists() {
            Self::read_config_from_disk(&config_path)?
        } else {
            let defaults = Config::default();
            Self::write_config_file(&config_path, &defaults)?;
            tracing::info!(path = ?config_path, "Wrote default config");
            defaults
        };
        tracing::info!(path = ?config_path, platform = %config.default_platform, "Config loaded");

        let (change_tx, _) = watch::channel(config.clone());
        Ok(Self {
            inner: Arc::new(ConfigManagerInner {
                config: RwLock::new(config),
                config_path,
                change_tx,
                watcher_active: AtomicBool::new(false),
            }),
        })
    }

    /// Polls the config file and publishes edits to subscribers.
    pub fn start_watching(&self) {
        if self.inner.watcher_active.swap(true, Ordering::SeqCst) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let mut seen = Self::file_state(&inner.config_path);
        tokio::spawn(async move {
            let mut ticker = time::interval(WATCH_INTERVAL);

            loop {
                ticker.tick().await;
                let state = Self::file_state(&inner.config_path);
                if state == seen {
                    continue;
                }
                seen = state;

                match inner.reload() {
                    Ok(Reload::Applied) => {
                        tracing::info!(path = ?inner.config_path, "Config reloaded");
                    }
                    Ok(Reload::Unchanged) => {}
                    Err(err) => {
                        // A poisoned lock cannot recover; anything else waits for the next edit.
                        if inner.config.is_poisoned() {
                            tracing::error!("Config lock poisoned; stopping watcher");
                            break;
                        }
                        tracing::warn!("Failed to reload config: {err:#}");
                    }
                }
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Config> {
        self.inner.change_tx.subscribe()
    }

    pub fn get(&self) -> Config {
        match self.inner.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.config_path
    }

    fn read_config_from_disk(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {:?}", path))?;
        Self::parse_config(&content)
    }

    fn write_config_file(path: &Path, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file at {:?}", path))
    }

    pub fn parse_config(content: &str) -> Result<Config> {
        let value = parse_to_serde_value(content, &ParseOptions::default())
            .context("Failed to parse config as JSONC")?
            .ok_or_else(|| anyhow!("Config file did not contain a JSON value"))?;
        serde_json::from_value(value).context("Failed to deserialize config")
    }

    fn file_state(path: &Path) -> Option<(SystemTime, u64)> {
        let metadata = fs::metadata(path).ok()?;
        let modified = metadata.modified().ok()?;
        Some((modified, metadata.len()))
    }
}
