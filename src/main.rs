//! GitHub Actions entry point for publishing releases, tags and release
//! pull requests.

use kodegen_release_action::cli;
use kodegen_release_action::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            let output = OutputManager::new(std::env::var("GITHUB_ACTIONS").as_deref() == Ok("true"), false);
            output.error(&format!("Fatal error: {e}"));

            for suggestion in e.recovery_suggestions() {
                let _ = output.indent(&suggestion);
            }

            process::exit(1);
        }
    }
}
