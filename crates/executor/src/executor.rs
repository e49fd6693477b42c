//! Command dispatch

use crate::command::Command;
use crate::handlers::{sales, stock};
use crate::output::Output;
use std::sync::Arc;
use stockguard_core::Result;
use stockguard_engine::Ledger;
use tracing::debug;

/// Dispatches [`Command`]s against a [`Ledger`]
///
/// Stateless apart from the shared ledger; one executor can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Executor {
    ledger: Arc<Ledger>,
}

impl Executor {
    /// Create an executor over a ledger
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// The ledger commands run against
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Execute one command
    ///
    /// `Ok` covers business outcomes, including refusals (see
    /// [`Output::status`]). `Err` is a validation or system fault; nothing
    /// was applied. Nothing is retried.
    pub fn execute(&self, command: Command) -> Result<Output> {
        debug!(command = command.name(), "executing");
        let ledger = self.ledger.as_ref();

        match command {
            Command::Sale { item_key } => sales::sale(ledger, item_key),
            Command::Trial {
                item_key,
                num_requests,
            } => sales::trial(ledger, item_key, num_requests),
            Command::CheckIn {
                item_key,
                is_defective,
            } => stock::check_in(ledger, item_key, is_defective),
            Command::Return {
                item_key,
                destination,
            } => stock::process_return(ledger, item_key, &destination),
            Command::Inventory => Ok(Output::Inventory(ledger.inventory())),
            Command::Item { item_key } => stock::item(ledger, item_key),
            Command::Bin { bin } => Ok(Output::Bin(ledger.list_bin(bin))),
            Command::Seed {
                item_key,
                name,
                count,
            } => stock::seed(ledger, item_key, name, count),
            Command::Stats => Ok(Output::Stats(ledger.stats())),
            Command::Flush => {
                ledger.flush()?;
                Ok(Output::Unit)
            }
        }
    }
}
