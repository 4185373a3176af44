//! # NAS Connect Back-Office Entry Point
//!
//! ```text
//! main.rs ────► tokio runtime, exit code
//! lib.rs ─────► logging, configuration, session, dispatch
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    match nas_backoffice::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error {}", e);
            ExitCode::FAILURE
        }
    }
}
