//! PID ファイルの形式と入出力
//!
//! 1 プロセス名につき 1 ファイル、中身は 10 進の PID と改行のみ:
//!
//! ```text
//! 4242
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{RegistryError, Result};

/// 永続化される単位（名前と作成時点の PID）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidRecord {
    pub name: String,
    pub pid: u32,
}

impl PidRecord {
    pub fn new(name: impl Into<String>, pid: u32) -> Self {
        Self {
            name: name.into(),
            pid,
        }
    }

    /// ファイルに書き込む内容
    pub fn to_file_contents(&self) -> String {
        format_pid(self.pid)
    }
}

pub(crate) fn format_pid(pid: u32) -> String {
    format!("{pid}\n")
}

/// ファイル内容の 1 行目を PID として解釈
pub(crate) fn parse_pid(content: &str) -> Option<u32> {
    content
        .lines()
        .next()
        .and_then(|line| line.trim().parse::<u32>().ok())
        .filter(|pid| *pid > 0)
}

/// プロセス名がファイル名として安全か
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

/// PID ファイルを読み込み（存在しなければ None）
pub(crate) fn read_pid(path: &Path) -> Result<Option<u32>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(RegistryError::io("read PID file", path, e)),
    };

    match parse_pid(&content) {
        Some(pid) => Ok(Some(pid)),
        None => Err(RegistryError::MalformedRecord {
            path: path.to_path_buf(),
            content,
        }),
    }
}

/// 排他的に新規作成して PID を書き込む
///
/// 既にファイルがあれば書き込まずに `Ok(false)` を返す。
pub(crate) fn create_exclusive(path: &Path, pid: u32) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(RegistryError::io("create PID file", path, e)),
    };

    file.write_all(format_pid(pid).as_bytes())
        .map_err(|e| RegistryError::io("write PID file", path, e))?;
    file.sync_all()
        .map_err(|e| RegistryError::io("sync PID file", path, e))?;

    Ok(true)
}

/// PID ファイルを削除（存在しなければ何もしない）
///
/// 実際に削除した場合は true。
pub(crate) fn remove(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(RegistryError::io("remove PID file", path, e)),
    }
}
