//! Check-in, return and inventory behavior

use crate::*;

#[test]
fn test_checkin_creates_then_increments() {
    let db = create_db();
    let first = db.stock.check_in("NEW", false).unwrap();
    assert!(first.created);
    assert_eq!(first.shelf_location, "Shelf A-12");

    let second = db.stock.check_in("NEW", false).unwrap();
    assert!(!second.created);

    let rec = db.stock.get("NEW").unwrap();
    assert_eq!(rec.count, 2);
    assert_eq!(rec.name, "Auto Product");
}

#[test]
fn test_defective_checkin_adds_no_stock() {
    let db = create_db_with("A", 2);
    let placement = db.stock.check_in("A", true).unwrap();
    assert_eq!(placement.shelf_location, "Quarantine Q-1");
    assert_eq!(db.stock.get("A").unwrap().count, 2);

    // An unseen id is registered with nothing sellable.
    let placement = db.stock.check_in("UNKNOWN", true).unwrap();
    assert!(placement.created);
    let rec = db.stock.get("UNKNOWN").unwrap();
    assert_eq!((rec.count, rec.reserved), (0, 0));
    assert_eq!(
        db.sales.sell("UNKNOWN").unwrap(),
        SaleOutcome::Prevented(PreventionReason::InsufficientStock)
    );

    // A second defective unit still leaves the count alone.
    let placement = db.stock.check_in("UNKNOWN", true).unwrap();
    assert!(!placement.created);
    assert_eq!(db.stock.get("UNKNOWN").unwrap().count, 0);
}

#[test]
fn test_returns_route_to_shelf_and_bins() {
    let db = create_db_with("A", 0);
    assert_eq!(
        db.sales.sell("A").unwrap(),
        SaleOutcome::Prevented(PreventionReason::InsufficientStock)
    );

    match db.stock.process_return("A", ReturnDestination::Shelf).unwrap() {
        ReturnOutcome::Restocked(rec) => assert_eq!(rec.count, 1),
        other => panic!("unexpected {:?}", other),
    }
    db.stock.process_return("A", ReturnDestination::Repair).unwrap();
    db.stock.process_return("A", ReturnDestination::Repair).unwrap();
    db.stock.process_return("B", ReturnDestination::Trash).unwrap();

    assert_eq!(db.stock.bin_count(Bin::Repair, "A"), 2);
    assert_eq!(db.stock.bin_count(Bin::Trash, "B"), 1);
    assert_eq!(db.stock.get("A").unwrap().count, 1);
    assert!(db.stock.get("B").unwrap_err().is_not_found());
}

#[test]
fn test_unknown_item_sale_is_prevented_not_error() {
    let db = create_db();
    assert_eq!(
        db.sales.sell("ghost").unwrap(),
        SaleOutcome::Prevented(PreventionReason::NotFound)
    );
}

#[test]
fn test_inventory_status_labels() {
    let db = create_db();
    db.stock.seed("OUT", "o", 0).unwrap();
    db.stock.seed("LOW", "l", 4).unwrap();
    db.stock.seed("OK", "k", 5).unwrap();

    let statuses: Vec<(String, StockStatus)> = db
        .stock
        .inventory()
        .into_iter()
        .map(|e| (e.record.id.to_string(), e.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("LOW".to_string(), StockStatus::Low),
            ("OK".to_string(), StockStatus::Ok),
            ("OUT".to_string(), StockStatus::Out),
        ]
    );
}

#[test]
fn test_blank_item_id_rejected() {
    let db = create_db();
    assert!(matches!(db.sales.sell("  "), Err(Error::InvalidInput(_))));
    assert!(matches!(db.stock.check_in("", false), Err(Error::InvalidInput(_))));
}
