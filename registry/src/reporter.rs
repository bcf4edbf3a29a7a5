use std::io::{self, Write};

use strongspace_shared::log_registry;

/// ユーザー向けエラー出力先
///
/// レジストリは致命的でないエラーをここに報告して処理を続ける。
pub trait ErrorReporter {
    fn report(&self, message: &str);
}

/// 標準エラー出力に書き出す実装（プロセスは終了させない）
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&self, message: &str) {
        // ログの既定出力も stderr なので、ここでは debug 止まり
        log_registry!(debug, "reported: {message}");
        let _ = write_report(&mut io::stderr().lock(), message);
    }
}

/// 1 報告につき 1 行
fn write_report(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{message}")
}
