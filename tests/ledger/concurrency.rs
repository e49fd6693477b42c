//! Contention tests
//!
//! - K units, N simultaneous buyers: exactly min(K, N) sales
//! - a long hold on one item does not delay another

use crate::*;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

fn race(stock: u64, buyers: usize) -> (usize, ItemRecord) {
    let db = Arc::new(create_db_with("SKU", stock));
    let barrier = Arc::new(Barrier::new(buyers));

    let handles: Vec<_> = (0..buyers)
        .map(|_| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                db.sales.sell("SKU").unwrap().is_sold()
            })
        })
        .collect();

    let sold = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|sold| *sold)
        .count();
    (sold, db.stock.get("SKU").unwrap())
}

/// Every (K, N) pair sells exactly min(K, N) and conserves units
#[test]
fn test_no_lost_updates() {
    for &stock in &[0u64, 1, 5] {
        for &buyers in &[1usize, 5, 50] {
            let (sold, rec) = race(stock, buyers);
            let expected = stock.min(buyers as u64);
            assert_eq!(sold as u64, expected, "K={} N={}", stock, buyers);
            assert_eq!(rec.count, stock - expected, "K={} N={}", stock, buyers);
            assert_eq!(rec.reserved, expected, "K={} N={}", stock, buyers);
        }
    }
}

/// The trial harness reports the same guarantee
#[test]
fn test_trial_sample_scenario() {
    let db = create_db_with("890123", 3);
    let report = db.sales.trial("890123", 5).unwrap();

    assert_eq!(report.successful, 3);
    assert_eq!(report.prevented, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.final_count, 0);
    assert_eq!(report.final_reserved, 3);
    assert!(report.upholds_guarantee());

    let waits: Vec<f64> = report.results.iter().map(|r| r.wait_time_ms).collect();
    assert!(waits.windows(2).all(|w| w[0] <= w[1]));
}

/// At the default hold and lock timeout, a long queue still accounts for
/// every attempt as sold or prevented
#[test]
fn test_default_trial_with_long_queue_has_no_faults() {
    let db = Stockguard::ephemeral().unwrap();
    db.stock.seed("DEEP", "Test Product", 60).unwrap();

    let report = db.sales.trial("DEEP", 60).unwrap();
    assert_eq!(report.failed, 0);
    assert_eq!(report.successful + report.prevented, report.total_requests);
    assert_eq!(report.successful, 60);
    assert_eq!(report.final_count, 0);
    assert_eq!(report.final_reserved, 60);
    assert!(report.upholds_guarantee());
}

/// Holding one item's lock does not block sales of another
#[test]
fn test_isolation_across_items() {
    let db = Arc::new(create_db());
    db.stock.seed("SLOW", "Slow", 10).unwrap();
    db.stock.seed("FAST", "Fast", 10).unwrap();

    let hold = Duration::from_millis(300);
    let slow = {
        let db = Arc::clone(&db);
        thread::spawn(move || db.sales.trial_with_hold("SLOW", 3, hold).unwrap())
    };

    // Let the trial take the SLOW lock first
    thread::sleep(Duration::from_millis(50));
    let started = Instant::now();
    assert!(db.sales.sell("FAST").unwrap().is_sold());
    assert!(started.elapsed() < hold);

    let report = slow.join().unwrap();
    assert_eq!(report.successful, 3);
}

/// A buyer that cannot get the lock in time gets a timeout, and nothing changes
#[test]
fn test_lock_timeout_leaves_item_unchanged() {
    let db = Arc::new(
        Stockguard::builder()
            .lock_timeout(Duration::from_millis(20))
            .ephemeral()
            .unwrap(),
    );
    db.stock.seed("A", "Widget", 5).unwrap();

    let holder = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            db.sales
                .trial_with_hold("A", 1, Duration::from_millis(300))
                .unwrap()
        })
    };
    thread::sleep(Duration::from_millis(50));

    let err = db.sales.sell("A").unwrap_err();
    assert!(err.is_retryable());

    holder.join().unwrap();
    let rec = db.stock.get("A").unwrap();
    assert_eq!((rec.count, rec.reserved), (4, 1));
}

/// Random mixes of sales and check-ins from many threads conserve units
#[test]
fn test_mixed_operations_conserve_units() {
    use rand::Rng;

    const THREADS: usize = 8;
    const OPS_PER_THREAD: usize = 200;

    let db = Arc::new(create_db_with("MIX", 10));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let (mut sold, mut received) = (0u64, 0u64);
                barrier.wait();
                for _ in 0..OPS_PER_THREAD {
                    if rng.gen_bool(0.7) {
                        if db.sales.sell("MIX").unwrap().is_sold() {
                            sold += 1;
                        }
                    } else {
                        db.stock.check_in("MIX", false).unwrap();
                        received += 1;
                    }
                }
                (sold, received)
            })
        })
        .collect();

    let (sold, received) = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .fold((0, 0), |acc, (s, r)| (acc.0 + s, acc.1 + r));

    let rec = db.stock.get("MIX").unwrap();
    assert_eq!(rec.reserved, sold);
    assert_eq!(rec.count + rec.reserved, 10 + received);
}
