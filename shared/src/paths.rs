use anyhow::{Context, Result};

use crate::log_paths;
use std::path::{Path, PathBuf};

/// strongspace 関連ディレクトリ名（ホーム直下）
pub const STRONGSPACE_DIR_NAME: &str = ".strongspace";

/// ホームディレクトリを起点としたフォルダ解決
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrongspacePaths {
    home: PathBuf,
}

impl StrongspacePaths {
    /// 現在のユーザーのホームディレクトリから解決
    pub fn detect() -> Result<Self> {
        let home = home::home_dir().context("Failed to get home directory")?;
        log_paths!(debug, "Resolved home directory {}", home.display());
        Ok(Self { home })
    }

    /// 明示的なホームディレクトリから解決（設定・テスト用）
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home
    }

    /// ~/.strongspace
    pub fn strongspace_dir(&self) -> PathBuf {
        self.home.join(STRONGSPACE_DIR_NAME)
    }

    /// ~/.strongspace/pids
    pub fn pids_dir(&self) -> PathBuf {
        self.strongspace_dir().join("pids")
    }

    /// ~/.strongspace/bin
    pub fn bin_dir(&self) -> PathBuf {
        self.strongspace_dir().join("bin")
    }

    /// ~/.strongspace/plugins
    pub fn plugins_dir(&self) -> PathBuf {
        self.strongspace_dir().join("plugins")
    }

    /// ~/Library/LaunchAgents（macOS のみ意味を持つ）
    pub fn launch_agents_dir(&self) -> PathBuf {
        self.home.join("Library").join("LaunchAgents")
    }

    /// 指定プロセス名の PID ファイルパス
    pub fn pid_file_path(&self, name: &str) -> PathBuf {
        self.pids_dir().join(name)
    }
}

pub fn running_on_a_mac() -> bool {
    cfg!(target_os = "macos")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_relative_to_home() {
        let paths = StrongspacePaths::from_home("/home/alice");

        assert_eq!(paths.home_dir(), Path::new("/home/alice"));
        assert_eq!(
            paths.strongspace_dir(),
            PathBuf::from("/home/alice/.strongspace")
        );
        assert_eq!(paths.pids_dir(), PathBuf::from("/home/alice/.strongspace/pids"));
        assert_eq!(paths.bin_dir(), PathBuf::from("/home/alice/.strongspace/bin"));
        assert_eq!(
            paths.plugins_dir(),
            PathBuf::from("/home/alice/.strongspace/plugins")
        );
        assert_eq!(
            paths.launch_agents_dir(),
            PathBuf::from("/home/alice/Library/LaunchAgents")
        );
    }

    #[test]
    fn test_pid_file_path() {
        let paths = StrongspacePaths::from_home("/home/alice");
        assert_eq!(
            paths.pid_file_path("sync"),
            PathBuf::from("/home/alice/.strongspace/pids/sync")
        );
    }

    #[test]
    fn test_running_on_a_mac() {
        assert_eq!(running_on_a_mac(), cfg!(target_os = "macos"));
    }
}
