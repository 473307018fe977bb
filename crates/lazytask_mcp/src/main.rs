//! `lazytask-mcp` entry point.
//!
//! Usage: `lazytask-mcp [stdio|health]`. Configuration comes from the
//! environment (`LAZYTASK_STORE_URL` or `REDIS_URL`, `LAZYTASK_LOG_LEVEL`,
//! `LAZYTASK_LOG_DIR`).
//!
//! `health` prints one JSON line (`{"ok":true}` or `{"ok":false,"error":…}`)
//! and exits non-zero when the store is unreachable.

use lazytask_core::{init_logging, AppConfig, StoreClient};
use lazytask_mcp::{health_report, is_healthy, run_stdio, McpServer};
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Stdio,
    Health,
}

fn parse_mode(arg: Option<&str>) -> Result<Mode, String> {
    match arg {
        None | Some("stdio") => Ok(Mode::Stdio),
        Some("health") => Ok(Mode::Health),
        Some("http") => Err(
            "http transport is not supported; run `lazytask-mcp stdio` or `lazytask-mcp health`"
                .to_string(),
        ),
        Some(other) => Err(format!("unknown mode `{other}`; expected `stdio` or `health`")),
    }
}

fn run() -> Result<ExitCode, Box<dyn Error>> {
    let arg = std::env::args().nth(1);
    let mode = parse_mode(arg.as_deref())?;

    let config = AppConfig::from_env()?;
    init_logging(&config.log_level, &config.log_target)?;
    let store = StoreClient::from_url(config.store_url);

    if mode == Mode::Health {
        let report = health_report(&store);
        println!("{report}");
        store.close();
        return Ok(if is_healthy(&report) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if let Err(err) = store.connect() {
        error!("event=startup module=mcp status=error error_code=store_unavailable error={err}");
        return Err(err.into());
    }
    info!(
        "event=startup module=mcp status=ok backend={}",
        store.url().backend_label()
    );

    let mut server = McpServer::new(store);
    run_stdio(&mut server)?;
    server.store().close();
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("lazytask-mcp: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_mode, Mode};

    #[test]
    fn parse_mode_defaults_to_stdio_and_accepts_health() {
        assert_eq!(parse_mode(None).unwrap(), Mode::Stdio);
        assert_eq!(parse_mode(Some("stdio")).unwrap(), Mode::Stdio);
        assert_eq!(parse_mode(Some("health")).unwrap(), Mode::Health);
    }

    #[test]
    fn parse_mode_rejects_http_and_unknown_modes() {
        let err = parse_mode(Some("http")).unwrap_err();
        assert!(err.contains("not supported"));
        assert!(parse_mode(Some("serve")).is_err());
    }
}
