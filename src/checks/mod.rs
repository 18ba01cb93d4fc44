//! Host check payloads
//!
//! Two interchangeable per-host checks, each exposed as a synchronous and an
//! asynchronous operation for the comparison harness. Both absorb their own
//! errors: a failed check is logged and the host counts as checked.

pub mod cert;
pub mod http;

pub use cert::CertCheck;
pub use http::HttpCheck;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::config::Settings;
use crate::parallel::{Operations, WorkerCommand, async_op, sync_op};

/// Which payload to benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// HTTP status of https://<host>
    Http,
    /// Days until the host's TLS certificate expires
    Cert,
}

impl Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Http => f.write_str("http"),
            CheckKind::Cert => f.write_str("cert"),
        }
    }
}

/// Build the operation pair for `kind`
pub fn operations(
    kind: CheckKind,
    settings: &Settings,
    worker: WorkerCommand,
) -> Result<Operations<String>> {
    let operations = match kind {
        CheckKind::Http => {
            let check = HttpCheck::new(settings.http.expected_status);
            Operations::new(
                sync_op(move |host: &String| check.check(host)),
                async_op(move |host: String| async move { check.check_async(&host).await }),
                worker,
            )
        }
        CheckKind::Cert => {
            let check = Arc::new(CertCheck::new(settings.cert.port)?);
            let blocking = Arc::clone(&check);
            Operations::new(
                sync_op(move |host: &String| blocking.check(host)),
                // No async TLS client here: the task blocks its runtime for the
                // whole handshake, so cooperative trials degrade to sequential.
                async_op(move |host: String| {
                    let check = Arc::clone(&check);
                    async move { check.check(&host) }
                }),
                worker,
            )
        }
    };

    Ok(operations)
}

/// Run one synchronous check; used by process-per-item workers
pub fn run_once(kind: CheckKind, settings: &Settings, host: &str) -> Result<()> {
    match kind {
        CheckKind::Http => HttpCheck::new(settings.http.expected_status).check(host),
        CheckKind::Cert => CertCheck::new(settings.cert.port)?.check(host),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_matches_cli_value() {
        for kind in [CheckKind::Http, CheckKind::Cert] {
            let parsed = CheckKind::from_str(&kind.to_string(), false).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_operations_keep_worker_command() {
        let settings = Settings::defaults().unwrap();
        let worker = WorkerCommand::new("concur-bench").args(["check", "--kind", "cert"]);
        let ops = operations(CheckKind::Cert, &settings, worker.clone()).unwrap();
        assert_eq!(ops.worker(), &worker);
    }
}
