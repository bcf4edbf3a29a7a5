// テストフィクスチャ
// Note: 各統合テストは独立してコンパイルされるため、使われない関数で
// dead_code警告が出る。実際には別のテストファイルから使用されている。

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use strongspace_registry::{
    ErrorReporter, ProbeOutcome, ProcessProbe, ProcessRegistry, RegistryConfig,
};
use tempfile::TempDir;

/// PID ごとに結果を決めておける生存確認
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    outcomes: Arc<Mutex<HashMap<u32, ProbeOutcome>>>,
    calls: Arc<Mutex<Vec<u32>>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pid: u32, outcome: ProbeOutcome) {
        self.outcomes.lock().unwrap().insert(pid, outcome);
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessProbe for ScriptedProbe {
    fn probe(&self, pid: u32) -> ProbeOutcome {
        self.calls.lock().unwrap().push(pid);
        // 未設定の PID は存在しない扱い
        self.outcomes
            .lock()
            .unwrap()
            .get(&pid)
            .cloned()
            .unwrap_or(ProbeOutcome::NotFound)
    }
}

/// 報告されたメッセージを溜めるエラー出力先
#[derive(Clone, Default)]
pub struct CollectingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// 一時ディレクトリ上のレジストリ一式
pub struct TestRegistry {
    pub dir: TempDir,
    pub registry: ProcessRegistry,
    pub probe: ScriptedProbe,
    pub reporter: CollectingReporter,
}

impl TestRegistry {
    pub fn pids_dir(&self) -> PathBuf {
        self.dir.path().join("pids")
    }

    pub fn pid_file(&self, name: &str) -> PathBuf {
        self.pids_dir().join(name)
    }

    /// レジストリを通さずに PID ファイルを直接書く
    pub fn write_raw(&self, name: &str, content: &str) {
        std::fs::create_dir_all(self.pids_dir()).unwrap();
        std::fs::write(self.pid_file(name), content).unwrap();
    }

    pub fn read_raw(&self, name: &str) -> String {
        std::fs::read_to_string(self.pid_file(name)).unwrap()
    }
}

pub fn create_test_registry() -> TestRegistry {
    let dir = tempfile::tempdir().unwrap();
    let probe = ScriptedProbe::new();
    let reporter = CollectingReporter::default();
    let registry = ProcessRegistry::new(RegistryConfig::new(dir.path().join("pids")))
        .with_probe(probe.clone())
        .with_reporter(reporter.clone());

    TestRegistry {
        dir,
        registry,
        probe,
        reporter,
    }
}

/// 一意なプロセス名を生成
pub fn generate_test_name() -> String {
    format!("test_{}", uuid::Uuid::new_v4().simple())
}
