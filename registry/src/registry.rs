use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use strongspace_shared::{log_registry, RegistryConfig};

use crate::error::{RegistryError, Result};
use crate::probe::{ProbeOutcome, ProcessProbe, SystemProbe};
use crate::record::{self, PidRecord};
use crate::reporter::{ErrorReporter, StderrReporter};

/// 生存確認の内部結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Running,
    /// 記録なし（孤児の削除後を含む）
    Absent,
    /// 記録は残っているが動作中と確認できない
    Stale,
}

/// 名前付きプロセスの PID ファイル管理
///
/// 名前ごとに `<pids_dir>/<name>` を 1 つだけ持ち、ファイルの有無を
/// 「動作中と見なす」唯一の根拠とする。生存確認の際に PID が既に
/// 存在しなければ、そのファイルは孤児として削除される。
pub struct ProcessRegistry {
    pids_dir: PathBuf,
    probe: Box<dyn ProcessProbe + Send + Sync>,
    reporter: Box<dyn ErrorReporter + Send + Sync>,
}

impl ProcessRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            pids_dir: config.pids_dir,
            probe: Box::new(SystemProbe),
            reporter: Box::new(StderrReporter),
        }
    }

    /// 生存確認の実装を差し替え
    pub fn with_probe(mut self, probe: impl ProcessProbe + Send + Sync + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// エラー出力先を差し替え
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + Send + Sync + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn pids_dir(&self) -> &Path {
        &self.pids_dir
    }

    pub fn pid_file_path(&self, name: &str) -> Result<PathBuf> {
        record::validate_name(name)?;
        Ok(self.pids_dir.join(name))
    }

    /// 記録されている PID を読み込み（ファイルがなければ None）
    pub fn read_pid_record(&self, name: &str) -> Result<Option<u32>> {
        let path = self.pid_file_path(name)?;
        record::read_pid(&path)
    }

    /// 名前付きプロセスが動作中か
    ///
    /// 記録された PID が存在しなければ PID ファイルを削除して false を返す。
    /// 権限不足やその他の確認失敗はエラー出力先に報告し、false を返す。
    pub fn is_process_running(&self, name: &str) -> bool {
        self.check(name) == Liveness::Running
    }

    fn check(&self, name: &str) -> Liveness {
        let pid = match self.read_pid_record(name) {
            Ok(Some(pid)) => pid,
            Ok(None) => return Liveness::Absent,
            Err(e) => {
                self.reporter.report(&e.to_string());
                return Liveness::Stale;
            }
        };

        match self.probe.probe(pid) {
            ProbeOutcome::Alive => Liveness::Running,
            ProbeOutcome::PermissionDenied => {
                // 実際は動作中の可能性もあるが「確認できない」は停止扱い
                self.reporter.report(&format!(
                    "No longer have permissions to check this PID ({pid} for {name})"
                ));
                Liveness::Stale
            }
            ProbeOutcome::NotFound => self.reap_orphan(name, pid),
            ProbeOutcome::Unknown(cause) => {
                self.reporter
                    .report(&format!("Unable to determine status for {pid} : {cause}"));
                Liveness::Stale
            }
        }
    }

    fn reap_orphan(&self, name: &str, pid: u32) -> Liveness {
        let path = self.pids_dir.join(name);
        match record::remove(&path) {
            Ok(_) => {
                log_registry!(info, "Removed orphaned PID file for {name} (pid {pid})");
                Liveness::Absent
            }
            Err(e) => {
                self.reporter.report(&e.to_string());
                Liveness::Stale
            }
        }
    }

    /// PID ファイルを作成
    ///
    /// 既に動作中なら何もせず `Ok(false)`。古いファイル（解析できない記録など）は
    /// 置き換える。書き込みは排他的作成で行い、同時に別の呼び出しが
    /// 先に作成していた場合も `Ok(false)` を返す。
    pub fn create_pid_file(&self, name: &str, pid: u32) -> Result<bool> {
        let path = self.pid_file_path(name)?;
        if pid == 0 {
            return Err(RegistryError::InvalidPid(pid));
        }

        let liveness = self.check(name);
        if liveness == Liveness::Running {
            log_registry!(debug, "{name} is already running, not creating PID file");
            return Ok(false);
        }

        fs::create_dir_all(&self.pids_dir)
            .map_err(|e| RegistryError::io("create PID directory", &self.pids_dir, e))?;

        // 確認時に残っていたファイルだけを置き換える
        if liveness == Liveness::Stale && record::remove(&path)? {
            log_registry!(debug, "Replacing stale PID file {}", path.display());
        }

        if !record::create_exclusive(&path, pid)? {
            log_registry!(warn, "PID file for {name} was created concurrently, leaving it in place");
            return Ok(false);
        }

        log_registry!(info, "Created PID file for {name} (pid {pid})");
        Ok(true)
    }

    /// PID ファイルを削除（存在しなければ何もしない）
    pub fn delete_pid_file(&self, name: &str) -> Result<()> {
        let path = self.pid_file_path(name)?;
        if record::remove(&path)? {
            log_registry!(info, "Deleted PID file for {name}");
        }
        Ok(())
    }

    /// 読み取り可能な全記録（名前順、生存確認はしない）
    pub fn list_records(&self) -> Result<Vec<PidRecord>> {
        let entries = match fs::read_dir(&self.pids_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RegistryError::io("read PID directory", &self.pids_dir, e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RegistryError::io("read PID directory", &self.pids_dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !record::is_valid_name(&name) {
                log_registry!(debug, "Skipping unexpected file {}", path.display());
                continue;
            }

            match record::read_pid(&path) {
                Ok(Some(pid)) => records.push(PidRecord { name, pid }),
                // 列挙と読み込みの間に削除された
                Ok(None) => {}
                Err(e) => {
                    log_registry!(debug, "Skipping {}: {e}", path.display());
                }
            }
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

impl std::fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("pids_dir", &self.pids_dir)
            .finish_non_exhaustive()
    }
}
