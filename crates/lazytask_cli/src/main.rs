//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `lazytask_core` linkage and store reachability without an MCP client.
//! - Keep output deterministic for quick local sanity checks.

use lazytask_core::{AppConfig, StoreClient};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("lazytask_core ping={}", lazytask_core::ping());
    println!("lazytask_core version={}", lazytask_core::core_version());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("store url={}", config.store_url);

    let store = StoreClient::from_url(config.store_url);
    match store.health_check() {
        Ok(()) => {
            println!("store health=ok backend={}", store.url().backend_label());
            store.close();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("store health=error error={err}");
            ExitCode::FAILURE
        }
    }
}
