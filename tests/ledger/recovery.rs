//! Journal recovery through the public API

use crate::*;
use std::fs::OpenOptions;
use std::io::Write;

#[test]
fn test_committed_sales_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = Stockguard::builder().path(dir.path()).open().unwrap();
        db.stock.seed("A", "Widget", 3).unwrap();
        db.sales.trial("A", 5).unwrap();
        db.stock.process_return("A", ReturnDestination::Repair).unwrap();
        db.flush().unwrap();
    }

    let db = Stockguard::open(dir.path()).unwrap();
    let rec = db.stock.get("A").unwrap();
    assert_eq!((rec.count, rec.reserved), (0, 3));
    assert_eq!(db.stock.bin_count(Bin::Repair, "A"), 1);
}

#[test]
fn test_torn_tail_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = Stockguard::builder().path(dir.path()).strict().open().unwrap();
        db.stock.seed("A", "Widget", 2).unwrap();
        db.sales.sell("A").unwrap();
    }

    // Half-written record after the last commit
    let path = dir.path().join(stockguard_engine::JOURNAL_FILE_NAME);
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[40, 0, 0, 0, 1, 2]).unwrap();
    drop(file);

    let db = Stockguard::open(dir.path()).unwrap();
    let rec = db.stock.get("A").unwrap();
    assert_eq!((rec.count, rec.reserved), (1, 1));

    // The ledger keeps working after recovery
    assert!(db.sales.sell("A").unwrap().is_sold());
}

#[test]
fn test_no_durability_leaves_no_journal() {
    let dir = tempfile::tempdir().unwrap();
    let db = Stockguard::builder()
        .path(dir.path())
        .no_durability()
        .open()
        .unwrap();
    db.stock.seed("A", "Widget", 1).unwrap();
    assert!(!dir
        .path()
        .join(stockguard_engine::JOURNAL_FILE_NAME)
        .exists());
}
