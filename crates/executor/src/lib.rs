//! Command execution layer for stockguard
//!
//! The request layer between a transport and the ledger. Requests arrive
//! as [`Command`] values (deserializable from JSON), are dispatched by the
//! [`Executor`], and come back as [`Output`] values with an HTTP-style
//! status. [`handle_json`] runs the whole path for one JSON document, which
//! is how the CLI's pipe mode serves line-delimited requests.
//!
//! Business outcomes (a prevented sale, a rejected return) are successful
//! executions with a 4xx status. Faults are `Err` and map to a status via
//! [`status_for_error`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod executor;
mod handlers;
mod output;
mod wire;

pub use command::Command;
pub use executor::Executor;
pub use output::{Output, PlacementResponse, ReturnResponse, SaleResponse};
pub use wire::{error_body, handle_json, status_for_error, Response};

pub use stockguard_core::{Error, Result};
