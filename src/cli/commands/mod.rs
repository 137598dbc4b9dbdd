//! Command execution with error reporting.

mod release;

pub use release::{Steps, run_action};

use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::error::Result;

/// Execute a run for the parsed arguments, returning the process exit code
pub async fn execute_command(args: Args, env: &EnvConfig) -> Result<i32> {
    let config = RuntimeConfig::new(env);

    match release::execute_release(&args, &config, env).await {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!("Release failed: {}", e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("Recovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&format!("• {}", suggestion));
                }
            }
            if e.is_recoverable() {
                config.indent("• The failure looks transient; re-running the job may succeed");
            }

            Ok(1)
        }
    }
}
