//! Results the executor returns

use serde::Serialize;
use stockguard_core::{
    BinRecord, ItemRecord, Placement, PreventionReason, ReturnDestination, ReturnOutcome,
    SaleOutcome,
};
use stockguard_engine::{InventoryEntry, TrialReport};
use stockguard_storage::StatsSnapshot;

/// Message returned for every successful check-in.
pub const CHECKIN_MESSAGE: &str = "Added successfully";

/// Outcome of a `sale` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    /// Whether a unit was sold
    pub success: bool,
    /// `Sold` or `Prevented`
    pub outcome: &'static str,
    /// Human readable outcome
    pub message: &'static str,
    /// Why the sale was prevented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PreventionReason>,
    /// Committed record after a sale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemRecord>,
}

impl From<SaleOutcome> for SaleResponse {
    fn from(outcome: SaleOutcome) -> Self {
        let message = outcome.message();
        match outcome {
            SaleOutcome::Sold(record) => SaleResponse {
                success: true,
                outcome: "Sold",
                message,
                reason: None,
                item: Some(record),
            },
            SaleOutcome::Prevented(reason) => SaleResponse {
                success: false,
                outcome: "Prevented",
                message,
                reason: Some(reason),
                item: None,
            },
        }
    }
}

/// Outcome of a `checkin` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResponse {
    /// Always true; check-in has no business failure
    pub success: bool,
    /// Where the unit went
    pub shelf_location: String,
    /// Human readable outcome
    pub message: &'static str,
    /// Whether the item record was created
    pub created: bool,
    /// Whether the unit was flagged defective
    pub defective: bool,
}

impl From<Placement> for PlacementResponse {
    fn from(placement: Placement) -> Self {
        Self {
            success: true,
            shelf_location: placement.shelf_location,
            message: CHECKIN_MESSAGE,
            created: placement.created,
            defective: placement.defective,
        }
    }
}

/// Outcome of a `return` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    /// Whether the unit was routed
    pub success: bool,
    /// Requested destination
    pub destination: ReturnDestination,
    /// New shelf count or bin tally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Why the return was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReturnResponse {
    pub(crate) fn new(destination: ReturnDestination, outcome: ReturnOutcome) -> Self {
        match outcome {
            ReturnOutcome::Restocked(record) => Self {
                success: true,
                destination,
                count: Some(record.count),
                message: None,
            },
            ReturnOutcome::Binned { count, .. } => Self {
                success: true,
                destination,
                count: Some(count),
                message: None,
            },
            ReturnOutcome::Rejected { message, .. } => Self {
                success: false,
                destination,
                count: None,
                message: Some(message),
            },
        }
    }
}

/// Result of executing one [`crate::Command`]
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// `sale`
    Sale(SaleResponse),
    /// `trial`
    Trial(TrialReport),
    /// `checkin`
    Placement(PlacementResponse),
    /// `return`
    Return(ReturnResponse),
    /// `inventory`
    Inventory(Vec<InventoryEntry>),
    /// `item` and `seed`
    Item(InventoryEntry),
    /// `bin`
    Bin(Vec<BinRecord>),
    /// `stats`
    Stats(StatsSnapshot),
    /// No payload
    Unit,
}

impl Output {
    /// HTTP-style status for this output
    ///
    /// A prevented sale is 400; a shelf return for an unknown item is 404;
    /// everything else that executed is 200.
    pub fn status(&self) -> u16 {
        match self {
            Output::Sale(sale) if !sale.success => 400,
            Output::Return(ret) if !ret.success => 404,
            _ => 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockguard_core::ItemId;

    #[test]
    fn test_sale_statuses() {
        let sold = Output::Sale(SaleOutcome::Sold(ItemRecord::new(ItemId::from("A"), "w", 0)).into());
        assert_eq!(sold.status(), 200);
        let prevented =
            Output::Sale(SaleOutcome::Prevented(PreventionReason::InsufficientStock).into());
        assert_eq!(prevented.status(), 400);
    }

    #[test]
    fn test_prevented_sale_body() {
        let body = serde_json::to_value(Output::Sale(
            SaleOutcome::Prevented(PreventionReason::NotFound).into(),
        ))
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["outcome"], "Prevented");
        assert_eq!(body["message"], "Overselling Prevented");
        assert_eq!(body["reason"], "notFound");
        assert!(body.get("item").is_none());
    }

    #[test]
    fn test_return_statuses() {
        let ok = ReturnResponse::new(
            ReturnDestination::Trash,
            ReturnOutcome::Binned {
                bin: stockguard_core::Bin::Trash,
                count: 2,
            },
        );
        assert_eq!(Output::Return(ok).status(), 200);

        let rejected = ReturnResponse::new(
            ReturnDestination::Shelf,
            ReturnOutcome::Rejected {
                destination: ReturnDestination::Shelf,
                message: "item A not found".into(),
            },
        );
        assert_eq!(Output::Return(rejected).status(), 404);
    }
}
