//! プロセス生存確認
//!
//! 対象プロセスに影響を与えずに PID の存在だけを調べる。
//! Unix では signal 0、Windows ではプロセスハンドルの問い合わせを使う。

use std::fmt;

/// 生存確認の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// プロセスが存在し、確認できた
    Alive,
    /// 該当するプロセスが存在しない（ESRCH 相当）
    NotFound,
    /// 確認する権限がない（EPERM 相当、実際には動いている可能性あり）
    PermissionDenied,
    /// その他の OS エラー
    Unknown(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Alive => write!(f, "alive"),
            ProbeOutcome::NotFound => write!(f, "not found"),
            ProbeOutcome::PermissionDenied => write!(f, "permission denied"),
            ProbeOutcome::Unknown(cause) => write!(f, "unknown ({cause})"),
        }
    }
}

/// 生存確認の差し替え可能な実装
pub trait ProcessProbe {
    fn probe(&self, pid: u32) -> ProbeOutcome;
}

/// OS に問い合わせる標準実装
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl ProcessProbe for SystemProbe {
    fn probe(&self, pid: u32) -> ProbeOutcome {
        let outcome = probe_pid(pid);
        strongspace_shared::log_probe!(debug, "pid {pid}: {outcome}");
        outcome
    }
}

#[cfg(unix)]
fn probe_pid(pid: u32) -> ProbeOutcome {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // pid_t に収まらない PID は存在し得ない
    let Ok(raw) = i32::try_from(pid) else {
        return ProbeOutcome::NotFound;
    };
    if raw <= 0 {
        return ProbeOutcome::NotFound;
    }

    // signal 0 (None) は存在と権限の確認だけを行う
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => ProbeOutcome::Alive,
        Err(Errno::ESRCH) => ProbeOutcome::NotFound,
        Err(Errno::EPERM) => ProbeOutcome::PermissionDenied,
        Err(e) => ProbeOutcome::Unknown(e.desc().to_string()),
    }
}

#[cfg(windows)]
fn probe_pid(pid: u32) -> ProbeOutcome {
    use winapi::shared::winerror::{ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER};
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::minwinbase::STILL_ACTIVE;
    use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
    use winapi::um::winnt::PROCESS_QUERY_LIMITED_INFORMATION;

    if pid == 0 {
        return ProbeOutcome::NotFound;
    }

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            return match GetLastError() {
                ERROR_ACCESS_DENIED => ProbeOutcome::PermissionDenied,
                ERROR_INVALID_PARAMETER => ProbeOutcome::NotFound,
                code => ProbeOutcome::Unknown(format!("OpenProcess failed with error {code}")),
            };
        }

        let mut exit_code = 0u32;
        let queried = GetExitCodeProcess(handle, &mut exit_code);
        let last_error = GetLastError();
        CloseHandle(handle);

        if queried == 0 {
            ProbeOutcome::Unknown(format!("GetExitCodeProcess failed with error {last_error}"))
        } else if exit_code == STILL_ACTIVE {
            ProbeOutcome::Alive
        } else {
            // ハンドルが残っているだけの終了済みプロセス
            ProbeOutcome::NotFound
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn probe_pid(_pid: u32) -> ProbeOutcome {
    ProbeOutcome::Unknown("process probing is not supported on this platform".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_self_is_alive() {
        assert_eq!(SystemProbe.probe(std::process::id()), ProbeOutcome::Alive);
    }

    #[test]
    fn test_probe_zero_is_not_found() {
        assert_eq!(SystemProbe.probe(0), ProbeOutcome::NotFound);
    }

    #[test]
    #[cfg(unix)]
    fn test_probe_out_of_range_pid() {
        assert_eq!(SystemProbe.probe(u32::MAX), ProbeOutcome::NotFound);
    }

    #[test]
    #[cfg(unix)]
    fn test_probe_reaped_child_is_not_found() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        assert_eq!(SystemProbe.probe(pid), ProbeOutcome::NotFound);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ProbeOutcome::Alive.to_string(), "alive");
        assert_eq!(
            ProbeOutcome::Unknown("EINVAL".to_string()).to_string(),
            "unknown (EINVAL)"
        );
    }
}
