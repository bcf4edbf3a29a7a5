//! 名前付きバックグラウンドプロセスの単一インスタンス管理
//!
//! `~/.strongspace/pids/<name>` に PID を 1 つ記録し、OS 上の実際の
//! 生存状態と突き合わせる。
//!
//! ```no_run
//! use strongspace_registry::{ProcessRegistry, RegistryConfig};
//!
//! # fn main() -> Result<(), strongspace_registry::RegistryError> {
//! let registry = ProcessRegistry::new(RegistryConfig::new("/home/alice/.strongspace/pids"));
//! if registry.create_pid_file("sync", std::process::id())? {
//!     // 同期処理 ...
//!     registry.delete_pid_file("sync")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod probe;
pub mod record;
pub mod registry;
pub mod reporter;

pub use error::{RegistryError, Result};
pub use probe::{ProbeOutcome, ProcessProbe, SystemProbe};
pub use record::{is_valid_name, PidRecord};
pub use registry::ProcessRegistry;
pub use reporter::{ErrorReporter, StderrReporter};
pub use strongspace_shared::RegistryConfig;
