use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::log_config;
use crate::logging::LogLevel;
use crate::paths::{StrongspacePaths, STRONGSPACE_DIR_NAME};

/// メインの設定構造体
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// パス設定
    #[serde(default)]
    pub paths: PathSettings,

    /// ログ設定
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// パス関連の設定
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathSettings {
    /// ホームディレクトリの上書き（未指定時は実際のホーム）
    pub home_dir: Option<PathBuf>,

    /// PID ファイル格納ディレクトリの上書き（未指定時は ~/.strongspace/pids）
    pub pids_dir: Option<PathBuf>,
}

/// ログ関連の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// 詳細ログを有効にするか（level より優先して debug にする）
    #[serde(default)]
    pub verbose: bool,

    /// ログレベル ("error", "warn", "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            verbose: false,
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// ProcessRegistry の構築に必要な設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// PID ファイルを置くディレクトリ
    pub pids_dir: PathBuf,
}

impl RegistryConfig {
    pub fn new(pids_dir: impl Into<PathBuf>) -> Self {
        Self {
            pids_dir: pids_dir.into(),
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// 設定ファイルに保存
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        // ディレクトリが存在しない場合は作成
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// デフォルトの設定ファイルパスを取得
    pub fn default_config_path() -> Result<PathBuf> {
        let home_dir = home::home_dir().context("Failed to get home directory")?;

        Ok(home_dir.join(STRONGSPACE_DIR_NAME).join("config.toml"))
    }

    /// 設定ファイルパスの候補を取得（優先順位順）
    pub fn config_path_candidates() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. カレントディレクトリの .strongspace/config.toml
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(STRONGSPACE_DIR_NAME).join("config.toml"));
        }

        // 2. ホームディレクトリの .strongspace/config.toml
        if let Some(home_dir) = home::home_dir() {
            paths.push(home_dir.join(STRONGSPACE_DIR_NAME).join("config.toml"));
        }

        // 3. XDG規格に従った設定ディレクトリ（Linux/Unix）
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(
                PathBuf::from(xdg_config_home)
                    .join("strongspace")
                    .join("config.toml"),
            );
        } else if let Some(home_dir) = home::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join("strongspace")
                    .join("config.toml"),
            );
        }

        paths
    }

    /// 設定ファイルを自動検出して読み込み
    pub fn load_auto() -> Result<Option<(Self, PathBuf)>> {
        for path in Self::config_path_candidates() {
            if path.exists() {
                log_config!(debug, "Loading config from {}", path.display());
                let config = Self::from_file(&path)?;
                return Ok(Some((config, path)));
            }
        }
        log_config!(debug, "No config file found, using defaults");
        Ok(None)
    }

    /// 環境変数で設定を上書き
    pub fn apply_env_overrides(&mut self) {
        // パス設定
        if let Ok(home_dir) = std::env::var("STRONGSPACE_HOME") {
            self.paths.home_dir = Some(PathBuf::from(home_dir));
        }

        if let Ok(pids_dir) = std::env::var("STRONGSPACE_PIDS_DIR") {
            self.paths.pids_dir = Some(PathBuf::from(pids_dir));
        }

        // ログ設定
        if let Ok(verbose) = std::env::var("STRONGSPACE_VERBOSE") {
            self.logging.verbose = verbose == "1" || verbose.to_lowercase() == "true";
        }

        if let Ok(level) = std::env::var("STRONGSPACE_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// 設定からフォルダ解決器を生成
    pub fn paths(&self) -> Result<StrongspacePaths> {
        match &self.paths.home_dir {
            Some(home_dir) => Ok(StrongspacePaths::from_home(home_dir)),
            None => StrongspacePaths::detect(),
        }
    }

    /// 設定からRegistryConfigを生成
    pub fn to_registry_config(&self) -> Result<RegistryConfig> {
        let paths = self.paths()?;

        let pids_dir = match &self.paths.pids_dir {
            Some(dir) => expand_home(dir, paths.home_dir()),
            None => paths.pids_dir(),
        };

        Ok(RegistryConfig { pids_dir })
    }

    /// 有効なログレベル（verbose 指定時は debug）
    pub fn log_level(&self) -> LogLevel {
        if self.logging.verbose {
            LogLevel::Debug
        } else {
            LogLevel::from(self.logging.level.as_str())
        }
    }

    /// 設定のサンプルを生成
    pub fn sample() -> Self {
        let mut config = Self::default();

        config.paths.pids_dir = Some(PathBuf::from("~/.strongspace/pids"));
        config.logging.verbose = false;
        config.logging.level = "info".to_string();

        config
    }
}

/// 先頭の "~" をホームディレクトリに展開
fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
