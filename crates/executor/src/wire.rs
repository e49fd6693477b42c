//! JSON request/response plumbing

use crate::command::Command;
use crate::executor::Executor;
use serde::Serialize;
use serde_json::{json, Value};
use stockguard_core::Error;
use tracing::warn;

/// One response: an HTTP-style status and a JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// 200 for success, 4xx for refusals and bad requests, 5xx for faults
    pub status: u16,
    /// Response body
    pub body: Value,
}

impl Response {
    /// True for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Status code for a fault
///
/// Validation faults are 400, missing entities 404, lock timeouts 503.
/// Everything else is an internal failure.
pub fn status_for_error(err: &Error) -> u16 {
    match err {
        Error::InvalidInput(_) => 400,
        Error::NotFound(_) => 404,
        Error::LockTimeout { .. } => 503,
        _ => 500,
    }
}

fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::InvalidInput(_) => "invalidInput",
        Error::NotFound(_) => "notFound",
        Error::LockTimeout { .. } => "lockTimeout",
        Error::Storage(_) => "storage",
        Error::Journal(_) => "journal",
        Error::Corruption(_) => "corruption",
        Error::Config(_) => "config",
        Error::Serialization(_) => "serialization",
        Error::Io(_) => "io",
        Error::Internal(_) => "internal",
    }
}

/// JSON body for a fault
pub fn error_body(err: &Error) -> Value {
    json!({
        "success": false,
        "error": error_kind(err),
        "message": err.to_string(),
    })
}

/// Parse, execute and render one JSON request
pub fn handle_json(executor: &Executor, input: &str) -> Response {
    let command: Command = match serde_json::from_str(input) {
        Ok(command) => command,
        Err(e) => {
            let err = Error::InvalidInput(format!("malformed request: {e}"));
            return Response {
                status: 400,
                body: error_body(&err),
            };
        }
    };

    let name = command.name();
    match executor.execute(command) {
        Ok(output) => {
            let status = output.status();
            match serde_json::to_value(&output) {
                Ok(body) => Response { status, body },
                Err(e) => {
                    let err = Error::Serialization(e.to_string());
                    Response {
                        status: 500,
                        body: error_body(&err),
                    }
                }
            }
        }
        Err(err) => {
            let status = status_for_error(&err);
            if status >= 500 {
                warn!(command = name, error = %err, "command failed");
            }
            Response {
                status,
                body: error_body(&err),
            }
        }
    }
}
