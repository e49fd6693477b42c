//! Sale and trial handlers

use crate::output::{Output, SaleResponse};
use stockguard_core::{ItemId, Result};
use stockguard_engine::Ledger;

/// Handle `sale`.
pub(crate) fn sale(ledger: &Ledger, item_key: String) -> Result<Output> {
    let outcome = ledger.attempt_sale(&ItemId::new(item_key))?;
    Ok(Output::Sale(SaleResponse::from(outcome)))
}

/// Handle `trial`.
pub(crate) fn trial(
    ledger: &Ledger,
    item_key: String,
    num_requests: Option<usize>,
) -> Result<Output> {
    let num_requests = num_requests.unwrap_or(ledger.config().trial.default_requests);
    let report = ledger.run_trial(&ItemId::new(item_key), num_requests)?;
    Ok(Output::Trial(report))
}
