#![allow(clippy::unwrap_used)]

use external_services::{
    configs::ConfigurationError,
    logger::{
        self,
        config::{Log, LogConsole, LogFormat},
    },
};

// The global subscriber can only be installed once per process, so both calls live in one test.
#[test]
fn console_logging_installs_once() {
    let config = Log {
        console: LogConsole {
            log_format: LogFormat::Json,
            filtering_directive: Some("info".to_string()),
            ..LogConsole::default()
        },
    };

    let guard = logger::setup(&config, "vindicia-connector", ["reqwest"]).unwrap();
    tracing::info!(flow = "Authorize", "logged through the installed subscriber");

    let second = logger::setup(&Log::default(), "vindicia-connector", ["reqwest"]);
    assert!(matches!(second, Err(ConfigurationError::LoggerError(_))));

    drop(guard);
}
