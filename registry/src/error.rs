use std::path::PathBuf;

/// PID レジストリのエラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// PID ファイルの中身が正の整数ではない（手動削除か create での上書きで回復）
    #[error("Malformed PID file {path}: {content:?} is not a positive integer")]
    MalformedRecord { path: PathBuf, content: String },

    #[error("Invalid process name {0:?}: use letters, digits, '_', '-' or '.'")]
    InvalidName(String),

    #[error("Invalid PID {0}: must be a positive integer")]
    InvalidPid(u32),

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RegistryError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RegistryError::MalformedRecord {
            path: PathBuf::from("/tmp/pids/sync"),
            content: "abc\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed PID file /tmp/pids/sync: \"abc\\n\" is not a positive integer"
        );

        let err = RegistryError::io(
            "read PID file",
            "/tmp/pids/sync",
            std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to read PID file /tmp/pids/sync: disk on fire"
        );

        assert!(RegistryError::InvalidPid(0).to_string().contains("positive"));
    }
}
